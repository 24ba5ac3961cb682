//! End-to-end ingestion scenarios over the CSV entry point.

use meter_ingest_rs::{AccountId, Error, InMemoryAccountStore, ParseFailure, RunTotals, ingest};

use crate::common::{store_with_accounts, timestamp};

const HEADER: &str = "AccountId,MeterReadingDateTime,MeterReadValue";

fn run_csv(rows: &[&str], store: &mut InMemoryAccountStore) -> (RunTotals, Vec<Error>) {
    let input = std::iter::once(HEADER)
        .chain(rows.iter().copied())
        .collect::<Vec<_>>()
        .join("\n");

    let mut errors = Vec::new();
    let totals = ingest(input.as_bytes(), store, |e| errors.push(e));
    (totals, errors)
}

#[test]
fn single_valid_reading_is_accepted_and_advances_the_account() {
    let mut store = store_with_accounts([1]);

    let (totals, errors) = run_csv(&["1, 22/04/2019 09:25, 01002"], &mut store);

    assert_eq!(
        totals,
        RunTotals {
            successes: 1,
            failures: 0
        }
    );
    assert!(errors.is_empty());

    let current = store
        .account(AccountId::new(1))
        .unwrap()
        .current_reading()
        .expect("account must now have a current reading");
    assert_eq!(current.value().get(), 1002);
    assert_eq!(current.timestamp(), timestamp(22, 9, 25));
    assert_eq!(store.readings(AccountId::new(1)).len(), 1);
}

#[test]
fn duplicate_submission_yields_one_success_one_failure() {
    let mut store = store_with_accounts([1]);

    let (totals, errors) = run_csv(
        &["1, 22/04/2019 09:25, 01002", "1, 22/04/2019 09:25, 01002"],
        &mut store,
    );

    assert_eq!(
        totals,
        RunTotals {
            successes: 1,
            failures: 1
        }
    );
    assert_eq!(errors.len(), 1);
    match &errors[0] {
        Error::Validation {
            row_id, reason, ..
        } => {
            assert_eq!(*row_id, 2);
            assert_eq!(reason, "Newer reading already exists");
        }
        other => panic!("expected a validation error, got: {other}"),
    }
    assert_eq!(store.readings(AccountId::new(1)).len(), 1);
}

#[test]
fn newer_reading_succeeds_even_when_the_value_runs_backwards() {
    let mut store = store_with_accounts([1]);

    let (totals, _) = run_csv(
        &["1, 22/04/2019 09:25, 09999", "1, 23/04/2019 09:25, 00001"],
        &mut store,
    );

    assert_eq!(
        totals,
        RunTotals {
            successes: 2,
            failures: 0
        }
    );
    let current = store
        .account(AccountId::new(1))
        .unwrap()
        .current_reading()
        .unwrap();
    assert_eq!(current.value().get(), 1);
}

#[test]
fn backdated_reading_fails_regardless_of_value() {
    let mut store = store_with_accounts([1]);

    let (totals, _) = run_csv(
        &["1, 23/04/2019 09:25, 01002", "1, 22/04/2019 09:25, 05000"],
        &mut store,
    );

    assert_eq!(
        totals,
        RunTotals {
            successes: 1,
            failures: 1
        }
    );
}

#[test]
fn unknown_account_fails_independently_of_date_and_value() {
    let mut store = store_with_accounts([1]);

    let (totals, errors) = run_csv(&["42, 22/04/2019 09:25, 01002"], &mut store);

    assert_eq!(
        totals,
        RunTotals {
            successes: 0,
            failures: 1
        }
    );
    assert!(matches!(
        errors[0],
        Error::AccountNotFound { row_id: 1, account_id } if account_id == AccountId::new(42)
    ));
}

#[test]
fn bad_rows_are_classified_and_counted() {
    let mut store = store_with_accounts([1]);

    let (totals, errors) = run_csv(
        &[
            "1, NOT A DATE, 01002",
            "1, 22/04/2019 09:25:26:26:26, 01002",
            "1, 22/04/2019 09:25, 0X765",
            "abc, 22/04/2019 09:25, 01002",
            "1, 22/04/2019 09:25",
        ],
        &mut store,
    );

    assert_eq!(
        totals,
        RunTotals {
            successes: 0,
            failures: 5
        }
    );

    let mut causes: Vec<(u64, ParseFailure)> = errors
        .into_iter()
        .map(|e| match e {
            Error::Parse { row_id, cause } => (row_id, cause),
            other => panic!("expected parse errors only, got: {other}"),
        })
        .collect();
    causes.sort_by_key(|(row_id, _)| *row_id);

    assert_eq!(causes[0], (1, ParseFailure::Timestamp));
    assert_eq!(causes[1], (2, ParseFailure::Timestamp));
    assert_eq!(causes[2], (3, ParseFailure::Value));
    assert!(matches!(causes[3], (4, ParseFailure::Frame(_))));
    assert!(matches!(causes[4], (5, ParseFailure::Frame(_))));
}

#[test]
fn counts_always_sum_to_the_number_of_rows() {
    let mut store = store_with_accounts([1, 2]);

    let rows = [
        "1, 22/04/2019 09:25, 01002",
        "2, 22/04/2019 09:25, 00999",
        "2, 22/04/2019 09:25, 00999",
        "3, 22/04/2019 09:25, 00124",
        "1, garbage, 00123",
        "2, 23/04/2019 09:25, 123",
    ];
    let (totals, _) = run_csv(&rows, &mut store);

    assert_eq!(totals.successes + totals.failures, rows.len() as u64);
    assert_eq!(
        totals,
        RunTotals {
            successes: 2,
            failures: 4
        }
    );
}
