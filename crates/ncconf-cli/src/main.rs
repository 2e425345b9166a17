//! `ncconf` converges a Nextcloud instance's system configuration.
//!
//! The result is printed to stdout as JSON. On failure the output is
//! `{"failed": true, "changed": .., "msg": ..}` and the exit status is 1.

mod cli;
mod logging;

use std::process::ExitCode;

use anyhow::Context;
use ncconf_occ::{converge, ConvergeError, ConvergeReport, OccStore};
use serde_json::json;

use crate::cli::Invocation;

fn main() -> ExitCode {
    let matches = cli::command().get_matches();
    let invocation = Invocation::from_matches(&matches);
    logging::init(invocation.verbosity, invocation.log_format);

    match run(&invocation).and_then(|report| render(&report)) {
        Ok(output) => {
            println!("{output}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            tracing::error!("{err}");
            println!("{}", failure(&err));
            ExitCode::FAILURE
        }
    }
}

fn run(invocation: &Invocation) -> anyhow::Result<ConvergeReport> {
    let declared = invocation.load_declared()?;
    let mut store = OccStore::open(&invocation.path, invocation.settings())?;
    let report = converge(&mut store, &declared, invocation.options())?;
    Ok(report)
}

fn render(report: &ConvergeReport) -> anyhow::Result<String> {
    serde_json::to_string_pretty(report).context("failed to render report")
}

/// Failure document; `changed` is set when operations were applied before
/// the error. Error messages already carry their causes.
fn failure(err: &anyhow::Error) -> serde_json::Value {
    let changed = err
        .downcast_ref::<ConvergeError>()
        .is_some_and(ConvergeError::is_partial);
    json!({
        "failed": true,
        "changed": changed,
        "msg": err.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ncconf_core::{Operation, ScalarValue};
    use ncconf_occ::StoreError;

    #[test]
    fn failure_document_for_store_error() {
        let err = anyhow::Error::new(StoreError::MissingNamespace("system".into()));
        let doc = failure(&err);
        assert_eq!(doc["failed"], true);
        assert_eq!(doc["changed"], false);
        assert_eq!(doc["msg"], "configuration listing has no 'system' section");
    }

    #[test]
    fn partial_execution_reports_changed() {
        let err = anyhow::Error::new(ConvergeError::Execution {
            operation: Operation::set("loglevel", ScalarValue::Integer(1)),
            applied: 2,
            source: StoreError::Rejected("read-only".into()),
        });
        assert_eq!(failure(&err)["changed"], true);
    }
}
