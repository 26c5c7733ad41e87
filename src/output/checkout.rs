//
//  bitbucket-checkout
//  output/checkout.rs
//
//  Created by Ngonidzashe Mangudya on 2026/01/12.
//  Copyright (c) 2025 IAMNGONI. All rights reserved.
//

//! Table rendering of a [`CheckoutConfiguration`].

use super::{print_field, print_header, TableBuilder, TableOutput};
use crate::scm::{CheckoutConfiguration, MergeDirective, PinDirective, RemoteSpec};

const NONE: &str = "-";

impl TableOutput for CheckoutConfiguration {
    fn print_table(&self, color: bool) {
        print_header("Remotes");
        TableBuilder::new()
            .color(color)
            .headers(["Name", "URL", "Refspec", "Credential"])
            .rows(self.remotes.iter().map(remote_row))
            .print();
        println!();

        print_field("Pin", &pin_summary(self.pin.as_ref()), color);
        print_field("Merge", &merge_summary(self.merge.as_ref()), color);
        print_field("Browser", &self.browser_url, color);
    }
}

/// Returns the table cells of one remote.
pub fn remote_row(remote: &RemoteSpec) -> Vec<String> {
    vec![
        remote.name.clone(),
        remote.url.clone(),
        remote.refspec.clone().unwrap_or_else(|| NONE.to_string()),
        remote
            .credential
            .as_ref()
            .map(|c| c.id.clone())
            .unwrap_or_else(|| NONE.to_string()),
    ]
}

/// Describes a pin in one line, e.g. `PR-1 @ 0123abcd`.
pub fn pin_summary(pin: Option<&PinDirective>) -> String {
    match pin {
        Some(PinDirective::Git {
            branch_name,
            commit_hash,
        }) => format!("{} @ {}", branch_name, commit_hash),
        Some(PinDirective::Mercurial { kind, value }) => format!("{:?} {}", kind, value),
        None => "branch tip".to_string(),
    }
}

/// Describes a merge step in one line.
pub fn merge_summary(merge: Option<&MergeDirective>) -> String {
    match merge {
        Some(MergeDirective {
            base_remote_ref,
            base_hash: Some(hash),
        }) => format!("onto {} @ {}", base_remote_ref, hash),
        Some(MergeDirective {
            base_remote_ref,
            base_hash: None,
        }) => format!("onto {}", base_remote_ref),
        None => NONE.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scm::{CredentialRef, HgRevisionKind};

    #[test]
    fn test_remote_row() {
        let remote = RemoteSpec {
            name: "default".to_string(),
            url: "https://bitbucket.org/tester/test-repo".to_string(),
            refspec: None,
            credential: Some(CredentialRef::username_password("ci")),
        };
        assert_eq!(
            remote_row(&remote),
            vec!["default", "https://bitbucket.org/tester/test-repo", "-", "ci"]
        );
    }

    #[test]
    fn test_pin_summary() {
        let git = PinDirective::Git {
            branch_name: "PR-1".to_string(),
            commit_hash: "0123abcd".to_string(),
        };
        assert_eq!(pin_summary(Some(&git)), "PR-1 @ 0123abcd");

        let hg = PinDirective::Mercurial {
            kind: HgRevisionKind::Branch,
            value: "default".to_string(),
        };
        assert_eq!(pin_summary(Some(&hg)), "Branch default");
        assert_eq!(pin_summary(None), "branch tip");
    }

    #[test]
    fn test_merge_summary() {
        let merge = MergeDirective {
            base_remote_ref: "remotes/upstream/main".to_string(),
            base_hash: None,
        };
        assert_eq!(merge_summary(Some(&merge)), "onto remotes/upstream/main");
        assert_eq!(merge_summary(None), "-");
    }
}
