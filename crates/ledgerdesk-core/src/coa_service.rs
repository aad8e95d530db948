//! Chart-of-accounts code generation and hierarchy helpers.

use ledgerdesk_domain::{ChartOfAccount, EntityId};

use crate::error::{CoreError, CoreResult, ValidationErrors};

const ROOT_CODE_LIMIT: usize = 9;
const CHILD_CODE_LIMIT: usize = 99;

/// One account with its children, ordered by code.
#[derive(Debug, Clone, PartialEq)]
pub struct CoaNode {
    pub account: ChartOfAccount,
    pub children: Vec<CoaNode>,
}

impl CoaNode {
    /// Depth-first walk yielding `(depth, account)`.
    pub fn flatten(&self) -> Vec<(usize, &ChartOfAccount)> {
        let mut out = Vec::new();
        self.walk(0, &mut out);
        out
    }

    fn walk<'a>(&'a self, depth: usize, out: &mut Vec<(usize, &'a ChartOfAccount)>) {
        out.push((depth, &self.account));
        for child in &self.children {
            child.walk(depth + 1, out);
        }
    }
}

pub struct CoaService;

impl CoaService {
    /// Next free code under `parent_code`.
    ///
    /// Siblings are counted by prefix: a child code is the parent code plus a
    /// two-digit suffix, a root code is a single digit.
    pub fn generate_account_code(
        parent_code: Option<&str>,
        accounts: &[ChartOfAccount],
    ) -> CoreResult<String> {
        let parent = parent_code.map(str::trim).unwrap_or("");
        let (width, limit) = if parent.is_empty() {
            (1, ROOT_CODE_LIMIT)
        } else {
            (2, CHILD_CODE_LIMIT)
        };

        let sibling_count = accounts
            .iter()
            .filter(|account| Self::is_direct_child(parent, &account.code, width))
            .count();

        let mut suffix = sibling_count + 1;
        while suffix <= limit {
            let candidate = format!("{}{:0width$}", parent, suffix, width = width);
            if !accounts.iter().any(|account| account.code == candidate) {
                return Ok(candidate);
            }
            suffix += 1;
        }
        let scope = if parent.is_empty() {
            "the chart of accounts".to_string()
        } else {
            format!("account {}", parent)
        };
        Err(CoreError::validation(
            "code",
            format!("No codes left under {} (limit {})", scope, limit),
        ))
    }

    fn is_direct_child(parent: &str, code: &str, width: usize) -> bool {
        code.len() == parent.len() + width
            && code.starts_with(parent)
            && code[parent.len()..].chars().all(|ch| ch.is_ascii_digit())
    }

    /// Fills code, parent link, level and type for a new child of `parent_code`.
    pub fn prepare_child(
        mut draft: ChartOfAccount,
        parent_code: Option<&str>,
        accounts: &[ChartOfAccount],
    ) -> CoreResult<ChartOfAccount> {
        if let Some(code) = parent_code.filter(|code| !code.trim().is_empty()) {
            let parent = accounts
                .iter()
                .find(|account| account.code == code.trim())
                .ok_or_else(|| {
                    CoreError::validation("parentCode", format!("Parent account {} not found", code))
                })?;
            if !parent.is_group {
                return Err(CoreError::validation(
                    "parentCode",
                    format!("{} is not a group account", parent.code),
                ));
            }
            draft = draft.with_parent(parent);
            draft.account_type = parent.account_type;
            if draft.company_id.is_none() {
                draft.company_id = parent.company_id;
            }
        } else {
            draft.parent_code = None;
            draft.parent_id = None;
            draft.level = 0;
        }
        draft.code = Self::generate_account_code(parent_code, accounts)?;
        Self::validate(&draft, accounts)?;
        Ok(draft)
    }

    pub fn validate(account: &ChartOfAccount, accounts: &[ChartOfAccount]) -> CoreResult<()> {
        let mut errors = ValidationErrors::default();
        errors.check(account.name.trim().is_empty(), "name", "Account name is required");
        errors.check(account.code.trim().is_empty(), "code", "Account code is required");
        errors.check(
            account.is_cash && account.is_bank,
            "isCash",
            "An account cannot be both cash and bank",
        );
        errors.check(
            account.is_group && account.is_liquid(),
            "isGroup",
            "Group accounts cannot be flagged cash or bank",
        );
        let duplicate = accounts
            .iter()
            .any(|other| other.code == account.code && other.id != account.id);
        errors.check(
            duplicate,
            "code",
            format!("Account code {} already exists", account.code),
        );
        if let Some(parent_code) = &account.parent_code {
            errors.check(
                !account.code.starts_with(parent_code.as_str()),
                "code",
                format!("Code must start with its parent code {}", parent_code),
            );
        }
        errors.into_result()
    }

    pub fn children<'a>(parent_code: &str, accounts: &'a [ChartOfAccount]) -> Vec<&'a ChartOfAccount> {
        let mut children: Vec<&ChartOfAccount> = accounts
            .iter()
            .filter(|account| account.parent_code.as_deref() == Some(parent_code))
            .collect();
        children.sort_by(|a, b| a.code.cmp(&b.code));
        children
    }

    /// Roots are accounts without a parent or whose parent is not in the list.
    pub fn build_tree(accounts: &[ChartOfAccount]) -> Vec<CoaNode> {
        let mut roots: Vec<&ChartOfAccount> = accounts
            .iter()
            .filter(|account| match &account.parent_code {
                None => true,
                Some(parent) => !accounts.iter().any(|other| &other.code == parent),
            })
            .collect();
        roots.sort_by(|a, b| a.code.cmp(&b.code));
        roots
            .into_iter()
            .map(|root| Self::node(root, accounts, 0))
            .collect()
    }

    fn node(account: &ChartOfAccount, accounts: &[ChartOfAccount], depth: usize) -> CoaNode {
        // Guards against cyclic parent links in server data.
        let children = if depth >= 32 {
            Vec::new()
        } else {
            Self::children(&account.code, accounts)
                .into_iter()
                .map(|child| Self::node(child, accounts, depth + 1))
                .collect()
        };
        CoaNode {
            account: account.clone(),
            children,
        }
    }

    /// Postable accounts: active, not groups.
    pub fn ledger_accounts(accounts: &[ChartOfAccount]) -> Vec<&ChartOfAccount> {
        accounts
            .iter()
            .filter(|account| account.is_active && !account.is_group)
            .collect()
    }

    pub fn find(accounts: &[ChartOfAccount], id: EntityId) -> Option<&ChartOfAccount> {
        accounts.iter().find(|account| account.id == Some(id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ledgerdesk_domain::AccountType;

    fn coa(id: EntityId, code: &str, parent: Option<&str>, group: bool) -> ChartOfAccount {
        let mut account = ChartOfAccount::new(code, format!("Account {}", code), AccountType::Asset);
        account.id = Some(id);
        account.parent_code = parent.map(str::to_string);
        account.is_group = group;
        account
    }

    fn chart() -> Vec<ChartOfAccount> {
        vec![
            coa(1, "1", None, true),
            coa(2, "101", Some("1"), true),
            coa(3, "102", Some("1"), true),
            coa(4, "10101", Some("101"), false),
            coa(5, "2", None, true),
        ]
    }

    #[test]
    fn child_code_counts_siblings() {
        let accounts = chart();
        assert_eq!(CoaService::generate_account_code(Some("1"), &accounts).unwrap(), "103");
        assert_eq!(CoaService::generate_account_code(Some("101"), &accounts).unwrap(), "10102");
        assert_eq!(CoaService::generate_account_code(Some("102"), &accounts).unwrap(), "10201");
    }

    #[test]
    fn root_code_is_single_digit() {
        assert_eq!(CoaService::generate_account_code(None, &chart()).unwrap(), "3");
    }

    #[test]
    fn taken_code_is_skipped() {
        // 101 deleted leaves one sibling but 102 is still taken.
        let accounts = vec![coa(1, "1", None, true), coa(3, "102", Some("1"), false)];
        assert_eq!(CoaService::generate_account_code(Some("1"), &accounts).unwrap(), "103");
    }

    #[test]
    fn exhausted_parent_is_a_validation_error() {
        let mut accounts = vec![coa(1, "1", None, true)];
        for n in 1..=99 {
            accounts.push(coa(100 + n, &format!("1{:02}", n), Some("1"), false));
        }
        let err = CoaService::generate_account_code(Some("1"), &accounts).unwrap_err();
        assert!(err.field_errors().iter().any(|error| error.field == "code"));
    }

    #[test]
    fn prepare_child_inherits_from_parent() {
        let accounts = chart();
        let mut draft = ChartOfAccount::new("", "Petty cash", AccountType::Expense);
        draft.is_cash = true;
        let account = CoaService::prepare_child(draft, Some("101"), &accounts).unwrap();
        assert_eq!(account.code, "10102");
        assert_eq!(account.parent_code.as_deref(), Some("101"));
        assert_eq!(account.parent_id, Some(2));
        assert_eq!(account.account_type, AccountType::Asset);
    }

    #[test]
    fn prepare_child_rejects_ledger_parent() {
        let draft = ChartOfAccount::new("", "Sub", AccountType::Asset);
        assert!(CoaService::prepare_child(draft, Some("10101"), &chart()).is_err());
        let draft = ChartOfAccount::new("", "Sub", AccountType::Asset);
        assert!(CoaService::prepare_child(draft, Some("999"), &chart()).is_err());
    }

    #[test]
    fn tree_is_ordered_by_code() {
        let tree = CoaService::build_tree(&chart());
        assert_eq!(tree.len(), 2);
        let codes: Vec<&str> = tree[0]
            .flatten()
            .into_iter()
            .map(|(_, account)| account.code.as_str())
            .collect();
        assert_eq!(codes, vec!["1", "101", "10101", "102"]);
    }
}
