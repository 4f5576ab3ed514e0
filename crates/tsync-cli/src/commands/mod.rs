pub mod add;
pub mod audit;
pub mod delete;
pub mod deploy;
pub mod heal;
pub mod init;
pub mod list;
pub mod misc;
pub mod required;
pub mod show;
pub mod sync;

use tsync_core::{AppGroup, SyncError, TemplateCategory};

use crate::errors::CliError;

/// Parse `--group`, listing the accepted values on failure.
pub(crate) fn parse_group(value: &str) -> anyhow::Result<AppGroup> {
    value.parse::<AppGroup>().map_err(|e| {
        CliError::invalid_input_with_hint(
            e.to_string(),
            "Groups: payment, order_status, marketing, support, uncategorized",
        )
        .into()
    })
}

pub(crate) fn parse_category(value: &str) -> anyhow::Result<TemplateCategory> {
    value.parse::<TemplateCategory>().map_err(|e| {
        CliError::invalid_input_with_hint(e.to_string(), "Categories: utility, marketing, authentication")
            .into()
    })
}

/// Turn a core `NotFound` into a CLI error that points at `tsync list`.
pub(crate) fn with_list_hint(err: SyncError, name: &str) -> anyhow::Error {
    match err {
        SyncError::NotFound(_) => CliError::not_found(
            format!("Template '{}' not found", name),
            "Run `tsync list` to see stored templates",
        )
        .into(),
        other => other.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::exit_codes;
    use crate::errors::exit_code_for;

    #[test]
    fn test_parse_group_accepts_aliases() {
        assert_eq!(parse_group("order-status").unwrap(), AppGroup::OrderStatus);
        let err = parse_group("jewellery").unwrap_err();
        assert_eq!(exit_code_for(&err), exit_codes::INVALID_INPUT);
    }

    #[test]
    fn test_not_found_gets_hint() {
        let err = with_list_hint(SyncError::NotFound("template 'x'".into()), "x");
        assert_eq!(exit_code_for(&err), exit_codes::NOT_FOUND);
        assert!(err.to_string().contains("Hint: Run `tsync list`"));
    }
}
