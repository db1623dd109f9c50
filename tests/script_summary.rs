// tests/script_summary.rs

use proptest::prelude::*;

use hostagent::action::summary::{join_names, ResultCollector, ScriptStatus};
use hostagent::errors::AgentError;
use hostagent::scriptrunner::{RunScriptResult, ScriptCompletion};

#[test]
fn join_names_uses_commas_and_final_and() {
    assert_eq!(join_names::<&str>(&[]), "");
    assert_eq!(join_names(&["a"]), "a");
    assert_eq!(join_names(&["a", "b"]), "a and b");
    assert_eq!(join_names(&["a", "b", "c"]), "a, b and c");
}

#[test]
fn collector_is_complete_after_expected_signals() {
    let mut collector = ResultCollector::new("run-me", 2);
    assert!(!collector.is_complete());

    collector.record(ScriptCompletion::Succeeded(RunScriptResult::new("a", "/a")));
    assert!(!collector.is_complete());
    collector.record(ScriptCompletion::Failed(RunScriptResult::new("b", "/b")));

    assert!(collector.is_complete());
    assert_eq!(collector.received(), 2);
}

#[test]
fn collector_with_nothing_expected_is_complete() {
    let collector = ResultCollector::new("run-me", 0);

    assert!(collector.is_complete());
    assert!(collector.finish().unwrap().is_empty());
}

fn job_names() -> impl Strategy<Value = Vec<(String, bool)>> {
    proptest::collection::btree_map("[a-z]{1,8}", any::<bool>(), 1..8)
        .prop_map(|m| m.into_iter().collect())
}

proptest! {
    #[test]
    fn join_names_keeps_every_name_in_order(names in proptest::collection::vec("[a-z]{1,6}", 1..6)) {
        let joined = join_names(&names);

        let mut rest = joined.as_str();
        for name in &names {
            let pos = rest.find(name.as_str());
            prop_assert!(pos.is_some());
            rest = &rest[pos.unwrap() + name.len()..];
        }
        prop_assert_eq!(joined.matches(" and ").count(), usize::from(names.len() > 1));
    }

    #[test]
    fn results_cover_every_signal_regardless_of_outcome(jobs in job_names()) {
        let mut collector = ResultCollector::new("run-me", jobs.len());
        for (job, ok) in &jobs {
            let result = RunScriptResult::new(job.as_str(), format!("/{job}"));
            collector.record(if *ok {
                ScriptCompletion::Succeeded(result)
            } else {
                ScriptCompletion::Failed(result)
            });
        }
        prop_assert!(collector.is_complete());

        let failed = jobs.iter().filter(|(_, ok)| !ok).count();
        let results = match collector.finish() {
            Ok(results) => {
                prop_assert_eq!(failed, 0);
                results
            }
            Err(AgentError::ScriptsFailed(failures)) => {
                prop_assert_eq!(failures.failed.len(), failed);
                prop_assert_eq!(failures.total, jobs.len());
                let prefix = format!("{} of {} run-me scripts failed.", failed, jobs.len());
                prop_assert!(failures.to_string().starts_with(&prefix));
                prop_assert_eq!(
                    failures.to_string().contains("Successful Jobs"),
                    failed < jobs.len()
                );
                failures.results
            }
            Err(e) => return Err(TestCaseError::fail(format!("unexpected error {e}"))),
        };

        prop_assert_eq!(results.len(), jobs.len());
        for (job, ok) in &jobs {
            let expected = if *ok { ScriptStatus::Executed } else { ScriptStatus::Failed };
            prop_assert_eq!(results[job], expected);
        }
    }
}
