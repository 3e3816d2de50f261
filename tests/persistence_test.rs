mod common;

use std::io::Write;

use anyhow::Result;
use common::{StandardGroup, balances, open_session, shares, test_config, test_service};
use fairshare::config::Backend;
use fairshare::domain::{LedgerError, PaymentEvent};
use fairshare::io::ImportOptions;
use fairshare::storage::LedgerStore;
use tempfile::TempDir;

#[tokio::test]
async fn test_new_session_sees_previous_state() -> Result<()> {
    for backend in [Backend::Csv, Backend::Sqlite] {
        let temp = TempDir::new()?;
        let config = test_config(&temp, backend, "alice");

        {
            let mut session = open_session(&config).await?;
            StandardGroup::create(&mut session).await?;
            session
                .record_payment(PaymentEvent::weighted("Bob", 10000, shares("50,30,20")))
                .await?;
        }

        let session = open_session(&config).await?;
        assert_eq!(session.participants(), vec!["Alice", "Bob", "Carol"]);
        assert_eq!(balances(&session), vec![-5000, 7000, -2000]);
    }
    Ok(())
}

#[tokio::test]
async fn test_identities_have_isolated_ledgers() -> Result<()> {
    for backend in [Backend::Csv, Backend::Sqlite] {
        let temp = TempDir::new()?;

        let mut alice = open_session(&test_config(&temp, backend, "alice")).await?;
        alice.add_participant("Alice").await?;

        let mut bob = open_session(&test_config(&temp, backend, "bob smith")).await?;
        assert!(bob.participants().is_empty());
        bob.add_participant("Bob").await?;

        let alice_again = open_session(&test_config(&temp, backend, "alice")).await?;
        assert_eq!(alice_again.participants(), vec!["Alice"]);
    }
    Ok(())
}

#[tokio::test]
async fn test_csv_record_is_named_after_identity() -> Result<()> {
    let temp = TempDir::new()?;
    let config = test_config(&temp, Backend::Csv, "bob smith");
    let mut session = open_session(&config).await?;
    session.add_participant("Bob").await?;

    let path = temp.path().join("expenses_bob_20smith.csv");
    assert_eq!(std::fs::read_to_string(path)?, "Participant,Amount\nBob,0.00\n");
    Ok(())
}

#[tokio::test]
async fn test_reset_deletes_record() -> Result<()> {
    for backend in [Backend::Csv, Backend::Sqlite] {
        let temp = TempDir::new()?;
        let config = test_config(&temp, backend, "alice");

        let mut session = open_session(&config).await?;
        StandardGroup::create(&mut session).await?;
        session
            .record_payment(PaymentEvent::equal("Alice", 9000))
            .await?;

        session.reset().await?;
        assert!(session.participants().is_empty());
        assert!(session.store().load().await?.is_empty());

        if backend == Backend::Csv {
            assert!(!temp.path().join("expenses_alice.csv").exists());
        }

        let reopened = open_session(&config).await?;
        assert!(reopened.participants().is_empty());
        assert_eq!(
            reopened.summary().unwrap_err().ledger_error(),
            Some(&LedgerError::EmptyLedger)
        );
    }
    Ok(())
}

#[tokio::test]
async fn test_summary_is_idempotent_and_read_only() -> Result<()> {
    let (mut service, _temp) = test_service().await?;
    StandardGroup::create(&mut service).await?;
    service
        .record_payment(PaymentEvent::equal("Bob", 1000))
        .await?;
    let stored_before = service.store().load().await?;

    let first = service.summary()?;
    let second = service.summary()?;
    assert_eq!(first, second);
    assert_eq!(service.store().load().await?, stored_before);
    Ok(())
}

#[tokio::test]
async fn test_export_matches_stored_file() -> Result<()> {
    let (mut service, _temp) = test_service().await?;
    StandardGroup::create(&mut service).await?;
    service
        .record_payment(PaymentEvent::equal("Alice", 9000))
        .await?;

    let blob = service.export()?;
    assert_eq!(blob.file_name, "expenses.csv");
    assert_eq!(blob.content_type, "text/csv");
    assert_eq!(
        String::from_utf8(blob.bytes.clone())?,
        "Participant,Amount\nAlice,60.00\nBob,-30.00\nCarol,-30.00\n"
    );
    assert_eq!(blob.bytes, std::fs::read(service.store().path())?);
    Ok(())
}

#[tokio::test]
async fn test_import_merges_and_persists() -> Result<()> {
    let (mut service, temp) = test_service().await?;
    service.add_participant("Alice").await?;

    let input = temp.path().join("legacy.csv");
    let mut file = std::fs::File::create(&input)?;
    write!(file, "Participant,Amount\nAlice,5.0\nBob,12.5\nCarol,oops\n")?;
    drop(file);

    let dry = service
        .import_csv(std::fs::File::open(&input)?, ImportOptions { replace: false, dry_run: true })
        .await?;
    assert_eq!(dry.imported, 1);
    assert_eq!(service.participants(), vec!["Alice"]);

    let result = service
        .import_csv(std::fs::File::open(&input)?, ImportOptions::default())
        .await?;
    assert_eq!(result.imported, 1);
    assert_eq!(result.skipped, 1);
    assert_eq!(result.errors.len(), 1);
    assert_eq!(result.errors[0].line, 4);

    assert_eq!(balances(&service), vec![0, 1250]);
    assert_eq!(&service.store().load().await?, service.ledger());
    Ok(())
}
