//! Integration tests for precondition policy handling.

use schemashift_core::changelog::{
    ChangeSet, DatabaseChangeLog, MigrationFailed, ParsedNode, PreconditionDecision,
};
use schemashift_core::database::GenericDatabase;
use schemashift_core::error::LoadError;
use schemashift_core::executor::{LoggingExecutor, MemoryExecutor};
use schemashift_core::precondition::{
    CheckContext, ErrorOption, FailOption, ListenerEvent, MemoryExecListener, OnSqlOutputOption,
    Precondition, PreconditionCheckError, PreconditionContainer, PreconditionErrored,
    PreconditionFailed,
};
use schemashift_core::ui::MemoryUiService;
use serde_json::json;

const BROKEN_SQL: &str = "select count(*) from missing_table";
const COUNT_SQL: &str = "select count(*) from person";

struct TestContext {
    database: GenericDatabase,
    executor: MemoryExecutor,
    change_log: DatabaseChangeLog,
    ui: MemoryUiService,
    listener: MemoryExecListener,
}

impl TestContext {
    fn new() -> Self {
        Self::with_executor(
            MemoryExecutor::new()
                .with_result(COUNT_SQL, 0)
                .with_failure(BROKEN_SQL, "relation does not exist"),
        )
    }

    fn with_executor(executor: MemoryExecutor) -> Self {
        let _ = tracing_subscriber::fmt().with_test_writer().try_init();
        Self {
            database: GenericDatabase::new("postgresql").with_username("deploy"),
            executor,
            change_log: DatabaseChangeLog::new("db/changelog.json"),
            ui: MemoryUiService::new(),
            listener: MemoryExecListener::new(),
        }
    }

    fn ctx(&self) -> CheckContext<'_> {
        CheckContext::new(&self.database, &self.executor, &self.change_log)
            .with_ui(&self.ui)
            .with_listener(&self.listener)
    }
}

fn dbms(types: &str) -> Precondition {
    Precondition::Dbms {
        types: types.to_string(),
    }
}

fn sql_check(sql: &str, expected: &str) -> Precondition {
    Precondition::SqlCheck {
        sql: sql.to_string(),
        expected_result: expected.to_string(),
    }
}

fn failing_container(on_fail: FailOption) -> PreconditionContainer {
    PreconditionContainer::new()
        .with_on_fail(on_fail)
        .with_precondition(dbms("postgresql"))
        .with_precondition(dbms("mysql"))
}

fn erroring_container(on_error: ErrorOption) -> PreconditionContainer {
    PreconditionContainer::new()
        .with_on_error(on_error)
        .with_precondition(sql_check(BROKEN_SQL, "0"))
}

fn expect_failed(result: Result<(), PreconditionCheckError>) -> PreconditionFailed {
    match result {
        Err(PreconditionCheckError::Failed(failed)) => failed,
        other => panic!("expected a failed outcome, got {:?}", other),
    }
}

fn expect_errored(result: Result<(), PreconditionCheckError>) -> PreconditionErrored {
    match result {
        Err(PreconditionCheckError::Errored(errored)) => errored,
        other => panic!("expected an errored outcome, got {:?}", other),
    }
}

// ============================================================================
// onFail
// ============================================================================

#[test]
fn test_on_fail_warn_passes_and_notifies() {
    let tc = TestContext::new();

    failing_container(FailOption::Warn).check(&tc.ctx()).unwrap();

    let messages = tc.ui.messages();
    assert_eq!(messages.len(), 1);
    assert!(messages[0].starts_with(
        "WARNING: Executing db/changelog.json despite precondition failure due to onFail='WARN':"
    ));
    assert!(messages[0].contains("1 preconditions failed"));
    assert!(messages[0].contains("DBMS Precondition failed: expected mysql, got postgresql"));

    assert_eq!(
        tc.listener.events(),
        vec![ListenerEvent::Failed {
            message: PreconditionFailed::DEFAULT_MESSAGE.to_string(),
            failed_count: 1,
            on_fail: FailOption::Warn,
        }]
    );
}

#[test]
fn test_on_fail_warn_uses_override_message() {
    let tc = TestContext::new();

    failing_container(FailOption::Warn)
        .with_on_fail_message("mysql only")
        .check(&tc.ctx())
        .unwrap();

    let messages = tc.ui.messages();
    assert_eq!(messages.len(), 1);
    assert!(messages[0].ends_with(":\n mysql only"));
}

#[test]
fn test_on_fail_propagates_without_override() {
    for on_fail in [FailOption::Halt, FailOption::Continue, FailOption::MarkRan] {
        let tc = TestContext::new();

        let failed = expect_failed(failing_container(on_fail).check(&tc.ctx()));

        assert_eq!(failed.message, PreconditionFailed::DEFAULT_MESSAGE);
        assert_eq!(failed.failed.len(), 1);
        assert_eq!(failed.on_fail, Some(on_fail));
        assert!(tc.ui.is_empty(), "{} must not message the UI", on_fail);
        assert!(tc.listener.events().is_empty());
    }
}

#[test]
fn test_on_fail_propagates_override_message() {
    for on_fail in [FailOption::Halt, FailOption::Continue, FailOption::MarkRan] {
        let tc = TestContext::new();

        let failed = expect_failed(
            failing_container(on_fail)
                .with_on_fail_message("requires mysql")
                .check(&tc.ctx()),
        );

        assert_eq!(failed.message, "requires mysql");
        assert_eq!(failed.failed.len(), 1);
        assert_eq!(failed.failed[0].message, "requires mysql");
        assert_eq!(failed.on_fail, Some(on_fail));
        assert!(tc.ui.is_empty());
    }
}

#[test]
fn test_every_child_is_visited() {
    let tc = TestContext::new();
    let container = PreconditionContainer::new()
        .with_precondition(dbms("postgresql"))
        .with_precondition(dbms("mysql"))
        .with_precondition(dbms("oracle"));

    let failed = expect_failed(container.check(&tc.ctx()));
    assert_eq!(failed.failed.len(), 2);

    let reordered = PreconditionContainer::new()
        .with_precondition(dbms("oracle"))
        .with_precondition(dbms("postgresql"))
        .with_precondition(dbms("mysql"));
    assert_eq!(expect_failed(reordered.check(&tc.ctx())).failed.len(), 2);
}

// ============================================================================
// onError
// ============================================================================

#[test]
fn test_on_error_continue_still_propagates() {
    let tc = TestContext::new();

    let errored = expect_errored(erroring_container(ErrorOption::Continue).check(&tc.ctx()));

    assert_eq!(errored.message, PreconditionErrored::DEFAULT_MESSAGE);
    assert_eq!(errored.errors.len(), 1);
    assert_eq!(errored.on_error, Some(ErrorOption::Continue));
    assert!(tc.listener.events().is_empty());
}

#[test]
fn test_on_error_continue_ignores_override() {
    let tc = TestContext::new();

    let errored = expect_errored(
        erroring_container(ErrorOption::Continue)
            .with_on_error_message("database unreachable")
            .check(&tc.ctx()),
    );

    assert_eq!(errored.message, PreconditionErrored::DEFAULT_MESSAGE);
}

#[test]
fn test_on_error_warn_swallows() {
    let tc = TestContext::new();

    erroring_container(ErrorOption::Warn).check(&tc.ctx()).unwrap();

    assert_eq!(
        tc.listener.events(),
        vec![ListenerEvent::Errored {
            message: PreconditionErrored::DEFAULT_MESSAGE.to_string(),
            error_count: 1,
            on_error: ErrorOption::Warn,
        }]
    );
    assert!(tc.ui.is_empty());
}

#[test]
fn test_on_error_halt_and_mark_ran_propagate() {
    for on_error in [ErrorOption::Halt, ErrorOption::MarkRan] {
        let tc = TestContext::new();

        let errored = expect_errored(erroring_container(on_error).check(&tc.ctx()));
        assert_eq!(errored.message, PreconditionErrored::DEFAULT_MESSAGE);
        assert_eq!(errored.on_error, Some(on_error));

        let overridden = expect_errored(
            erroring_container(on_error)
                .with_on_error_message("database unreachable")
                .check(&tc.ctx()),
        );
        assert_eq!(overridden.message, "database unreachable");
        assert_eq!(overridden.errors.len(), 1);
        assert!(overridden.errors[0]
            .cause
            .to_string()
            .contains("relation does not exist"));
    }
}

#[test]
fn test_errors_and_failures_together_raise_error() {
    let tc = TestContext::new();
    let container = PreconditionContainer::new()
        .with_precondition(dbms("mysql"))
        .with_precondition(sql_check(BROKEN_SQL, "0"));

    let errored = expect_errored(container.check(&tc.ctx()));
    assert_eq!(errored.errors.len(), 1);
    assert_eq!(errored.failed.len(), 1);
}

fn failing_and_erroring(on_fail: FailOption, on_error: ErrorOption) -> PreconditionContainer {
    PreconditionContainer::new()
        .with_on_fail(on_fail)
        .with_on_error(on_error)
        .with_precondition(dbms("mysql"))
        .with_precondition(sql_check(BROKEN_SQL, "0"))
}

fn gate(
    container: PreconditionContainer,
    tc: &TestContext,
) -> Result<PreconditionDecision, MigrationFailed> {
    ChangeSet::new("9", "dana", "db/changelog.json")
        .with_preconditions(container)
        .check_preconditions(&tc.ctx())
}

#[test]
fn test_error_warn_keeps_halting_failure() {
    let tc = TestContext::new();

    let container = failing_and_erroring(FailOption::Halt, ErrorOption::Warn);
    let failed = expect_failed(container.check(&tc.ctx()));
    assert_eq!(failed.on_fail, Some(FailOption::Halt));
    assert_eq!(failed.failed.len(), 1);

    let halted = gate(container, &tc).unwrap_err();
    assert_eq!(halted.ran_on, "db/changelog.json::9::dana");
    assert!(halted.cause.as_failed().is_some());
}

#[test]
fn test_error_continue_does_not_skip_halting_failure() {
    let tc = TestContext::new();

    let halted =
        gate(failing_and_erroring(FailOption::Halt, ErrorOption::Continue), &tc).unwrap_err();
    assert!(halted.cause.as_failed().is_some());
}

#[test]
fn test_failure_warn_leaves_error_policy_standing() {
    let tc = TestContext::new();

    let decision = gate(failing_and_erroring(FailOption::Warn, ErrorOption::Continue), &tc);
    assert_eq!(decision, Ok(PreconditionDecision::Skip));
    assert_eq!(tc.ui.messages().len(), 1);

    let halted = gate(failing_and_erroring(FailOption::Warn, ErrorOption::Halt), &tc).unwrap_err();
    assert!(halted.cause.as_errored().is_some());
}

// ============================================================================
// SQL output mode
// ============================================================================

fn sql_output_context() -> TestContext {
    TestContext::with_executor(MemoryExecutor::new().with_result(COUNT_SQL, 5).sql_only())
}

fn sql_output_container(on_sql_output: OnSqlOutputOption) -> PreconditionContainer {
    PreconditionContainer::new()
        .with_on_sql_output(on_sql_output)
        .with_precondition(sql_check(COUNT_SQL, "0"))
}

#[test]
fn test_sql_output_fail_never_queries() {
    let tc = sql_output_context();

    let failed = expect_failed(sql_output_container(OnSqlOutputOption::Fail).check(&tc.ctx()));

    assert_eq!(
        failed.message,
        "Unexpected precondition in updateSQL mode with onUpdateSQL value: FAIL"
    );
    assert_eq!(failed.failed.len(), 1);
    assert!(tc.executor.log().is_empty());
}

#[test]
fn test_sql_output_ignore_passes_without_queries() {
    let tc = sql_output_context();

    sql_output_container(OnSqlOutputOption::Ignore)
        .check(&tc.ctx())
        .unwrap();

    assert!(tc.executor.log().is_empty());
}

#[test]
fn test_sql_output_test_evaluates() {
    let tc = sql_output_context();

    let failed = expect_failed(sql_output_container(OnSqlOutputOption::Test).check(&tc.ctx()));

    assert_eq!(
        failed.failed[0].message,
        "SQL Precondition failed.  Expected '0' got '5'"
    );
    assert_eq!(tc.executor.log(), vec![format!("query {}", COUNT_SQL)]);
}

#[test]
fn test_update_mode_ignores_sql_output_option() {
    let tc = TestContext::new();

    sql_output_container(OnSqlOutputOption::Fail)
        .check(&tc.ctx())
        .unwrap();

    assert_eq!(tc.executor.log(), vec![format!("query {}", COUNT_SQL)]);
}

#[test]
fn test_logging_executor_delegates_checks() {
    let database = GenericDatabase::new("postgresql");
    let executor = LoggingExecutor::new(MemoryExecutor::new().with_result(COUNT_SQL, 0));
    let change_log = DatabaseChangeLog::new("db/changelog.json");
    let ctx = CheckContext::new(&database, &executor, &change_log);

    sql_output_container(OnSqlOutputOption::Test)
        .check(&ctx)
        .unwrap();

    assert_eq!(executor.delegate().log().len(), 1);
    assert!(executor.statements().is_empty());
}

// ============================================================================
// Loading
// ============================================================================

#[test]
fn test_load_options_ignoring_case() {
    let node = ParsedNode::from_json(
        "preConditions",
        &json!({ "onFail": "warn", "onError": "Halt", "onSqlOutput": "test" }),
    );

    let container = PreconditionContainer::load(&node).unwrap();

    assert_eq!(container.on_fail(), FailOption::Warn);
    assert_eq!(container.on_error(), ErrorOption::Halt);
    assert_eq!(container.on_sql_output(), OnSqlOutputOption::Test);
    assert!(container.nested().is_empty());
}

#[test]
fn test_load_rejects_unknown_option() {
    let node = ParsedNode::from_json("preConditions", &json!({ "onFail": "bogus" }));

    let err = PreconditionContainer::load(&node).unwrap_err();

    assert!(matches!(err, LoadError::UnknownOption { .. }));
    assert_eq!(
        err.to_string(),
        "Unknown onFail attribute value 'bogus'.  Possible values: HALT, CONTINUE, MARK_RAN, WARN"
    );
}

#[test]
fn test_load_defaults_and_messages() {
    let node = ParsedNode::from_json(
        "preConditions",
        &json!([
            { "onFailMessage": "needs person table" },
            { "tableExists": { "tableName": "person" } },
            { "not": [ { "dbms": { "type": "h2" } } ] }
        ]),
    );

    let container = PreconditionContainer::load(&node).unwrap();

    assert_eq!(container.on_fail(), FailOption::Halt);
    assert_eq!(container.on_error(), ErrorOption::Halt);
    assert_eq!(container.on_sql_output(), OnSqlOutputOption::Ignore);
    assert_eq!(container.on_fail_message(), Some("needs person table"));
    assert_eq!(container.nested().len(), 2);
}

// ============================================================================
// Change set gate
// ============================================================================

#[test]
fn test_change_set_gate() {
    let tc = TestContext::new();
    let decide = |on_fail| {
        ChangeSet::new("7", "dana", "db/changelog.json")
            .with_preconditions(failing_container(on_fail))
            .check_preconditions(&tc.ctx())
    };

    assert_eq!(decide(FailOption::Continue), Ok(PreconditionDecision::Skip));
    assert_eq!(decide(FailOption::MarkRan), Ok(PreconditionDecision::MarkRan));
    assert_eq!(decide(FailOption::Warn), Ok(PreconditionDecision::Run));

    let MigrationFailed { ran_on, cause } = decide(FailOption::Halt).unwrap_err();
    assert_eq!(ran_on, "db/changelog.json::7::dana");
    assert!(cause.as_failed().is_some());

    let on_fail_seen: Vec<_> = tc
        .listener
        .events()
        .into_iter()
        .filter_map(|event| match event {
            ListenerEvent::Failed { on_fail, .. } => Some(on_fail),
            ListenerEvent::Errored { .. } => None,
        })
        .collect();
    assert_eq!(
        on_fail_seen,
        vec![
            FailOption::Continue,
            FailOption::MarkRan,
            FailOption::Warn,
            FailOption::Halt
        ]
    );

    let warning = &tc.ui.messages()[0];
    assert!(warning.starts_with("WARNING: Executing db/changelog.json::7::dana despite"));
}

#[test]
fn test_change_set_gate_on_error() {
    let tc = TestContext::new();
    let decide = |on_error| {
        ChangeSet::new("8", "dana", "db/changelog.json")
            .with_preconditions(erroring_container(on_error))
            .check_preconditions(&tc.ctx())
    };

    assert_eq!(decide(ErrorOption::Continue), Ok(PreconditionDecision::Skip));
    assert_eq!(decide(ErrorOption::MarkRan), Ok(PreconditionDecision::MarkRan));
    assert_eq!(decide(ErrorOption::Warn), Ok(PreconditionDecision::Run));
    assert!(decide(ErrorOption::Halt).unwrap_err().cause.as_errored().is_some());
}

#[test]
fn test_change_log_level_gate() {
    let tc = TestContext::new();
    let change_log = DatabaseChangeLog::new("db/changelog.json")
        .with_preconditions(failing_container(FailOption::Halt));
    let ctx = CheckContext::new(&tc.database, &tc.executor, &change_log);

    let err = change_log.check_preconditions(&ctx).unwrap_err();
    assert_eq!(err.ran_on, "db/changelog.json");
}
