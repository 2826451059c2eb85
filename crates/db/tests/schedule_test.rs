//! Integration tests for the schedule engine repository.

mod common;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sea_orm::{EntityTrait, PaginatorTrait};
use uuid::Uuid;
use wayfare_core::audit::{AuditAction, AuditEntityType};
use wayfare_core::payments::{CreateTransactionInput, PaymentStatus, TransactionType};
use wayfare_core::schedule::{
    ApplyTemplateInput, CreateScheduleInput, DepositSpec, ExpectedItemInput, GuaranteeInput,
    ItemPatch, ScheduleError, ScheduleType, UpdateScheduleInput,
};
use wayfare_core::template::{CreateTemplateInput, TemplateItemPayload, UpdateTemplateInput};
use wayfare_core::tico::TicoIssueCode;
use wayfare_db::entities::{
    expected_payment_items, payment_schedule_configs, payment_transactions,
};
use wayfare_db::repositories::ScheduleStoreError;
use wayfare_db::{ScheduleRepository, TemplateRepository, TransactionRepository};

use common::{RecordingAuditSink, actor, days_from_today, priced_activity, setup_db, today};

const TOTAL: i64 = 200_000;

fn item(name: &str, amount: i64, due_in_days: u64) -> ExpectedItemInput {
    ExpectedItemInput {
        payment_name: name.to_string(),
        expected_amount_cents: amount,
        due_date: Some(days_from_today(due_in_days)),
    }
}

fn installments(activity_pricing_id: Uuid, items: Vec<ExpectedItemInput>) -> CreateScheduleInput {
    CreateScheduleInput {
        activity_pricing_id,
        schedule_type: ScheduleType::Installments,
        allow_partial_payments: true,
        deposit: None,
        items: Some(items),
        guarantee: None,
    }
}

fn payment(item_id: Uuid, amount_cents: i64) -> CreateTransactionInput {
    CreateTransactionInput {
        expected_payment_item_id: item_id,
        transaction_type: TransactionType::Payment,
        amount_cents,
        currency: "CAD".parse().expect("valid currency"),
        payment_method: Some("visa".to_string()),
        reference_number: None,
        transaction_date: today(),
        notes: None,
    }
}

fn template_input(deposit_pct: Decimal, final_days_before: i32) -> CreateTemplateInput {
    CreateTemplateInput {
        name: "Deposit then balance".to_string(),
        description: None,
        schedule_type: ScheduleType::Deposit,
        is_default: false,
        items: vec![
            TemplateItemPayload {
                payment_name: "Deposit".to_string(),
                sequence_order: Some(1),
                percentage: Some(deposit_pct),
                days_from_booking: Some(0),
                ..TemplateItemPayload::default()
            },
            TemplateItemPayload {
                payment_name: "Final balance".to_string(),
                sequence_order: Some(2),
                percentage: Some(dec!(100) - deposit_pct),
                days_before_departure: Some(final_days_before),
                ..TemplateItemPayload::default()
            },
        ],
    }
}

fn apply_input(template_id: Uuid) -> ApplyTemplateInput {
    ApplyTemplateInput {
        template_id,
        booking_date: None,
        departure_date: days_from_today(180),
        total_amount_cents: TOTAL,
    }
}

// ============================================================================
// Create and get
// ============================================================================

#[tokio::test]
async fn test_create_schedule_with_inline_items() {
    let db = setup_db().await;
    let audit = RecordingAuditSink::new();
    let repo = ScheduleRepository::new(db.clone(), audit.clone());
    let agency_id = Uuid::new_v4();
    let (_, pricing_id) = priced_activity(&db, agency_id, Some(TOTAL)).await;

    let schedule = repo
        .create(
            agency_id,
            &actor(),
            installments(
                pricing_id,
                vec![item("First", 100_000, 30), item("Second", 100_000, 90)],
            ),
        )
        .await
        .expect("create schedule");

    assert_eq!(schedule.config.activity_pricing_id, pricing_id);
    assert_eq!(schedule.config.schedule_type, ScheduleType::Installments);
    assert!(schedule.guarantee.is_none());
    let orders: Vec<i32> = schedule.items.iter().map(|i| i.sequence_order).collect();
    assert_eq!(orders, [1, 2]);
    assert!(
        schedule
            .items
            .iter()
            .all(|i| i.status == PaymentStatus::Pending && i.paid_amount_cents == 0)
    );

    let fetched = repo.get(pricing_id, agency_id).await.expect("get schedule");
    assert_eq!(fetched.config.id, schedule.config.id);
    assert_eq!(fetched.items.len(), 2);

    let entries = audit.entries();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].entity_type, AuditEntityType::Config);
    assert_eq!(entries[0].action, AuditAction::Created);
}

#[tokio::test]
async fn test_create_rejects_items_not_summing_to_total() {
    let db = setup_db().await;
    let repo = ScheduleRepository::new(db.clone(), RecordingAuditSink::new());
    let agency_id = Uuid::new_v4();
    let (_, pricing_id) = priced_activity(&db, agency_id, Some(TOTAL)).await;

    let err = repo
        .create(
            agency_id,
            &actor(),
            installments(pricing_id, vec![item("Only", 150_000, 30)]),
        )
        .await
        .expect_err("sum mismatch");

    assert!(matches!(
        err,
        ScheduleStoreError::Validation(ScheduleError::SumMismatch {
            difference_cents: -50_000,
            ..
        })
    ));
    let configs = payment_schedule_configs::Entity::find()
        .count(&db)
        .await
        .expect("count configs");
    assert_eq!(configs, 0);
}

#[tokio::test]
async fn test_create_requires_priced_activity() {
    let db = setup_db().await;
    let repo = ScheduleRepository::new(db.clone(), RecordingAuditSink::new());
    let agency_id = Uuid::new_v4();
    let (_, pricing_id) = priced_activity(&db, agency_id, None).await;

    let err = repo
        .create(agency_id, &actor(), installments(pricing_id, vec![]))
        .await
        .expect_err("no total price");
    assert!(matches!(
        err,
        ScheduleStoreError::Validation(ScheduleError::MissingTotalPrice(id)) if id == pricing_id
    ));
}

#[tokio::test]
async fn test_second_create_conflicts() {
    let db = setup_db().await;
    let repo = ScheduleRepository::new(db.clone(), RecordingAuditSink::new());
    let agency_id = Uuid::new_v4();
    let (_, pricing_id) = priced_activity(&db, agency_id, Some(TOTAL)).await;
    let input = installments(pricing_id, vec![item("Full", TOTAL, 30)]);

    repo.create(agency_id, &actor(), input.clone())
        .await
        .expect("first create");
    let err = repo
        .create(agency_id, &actor(), input)
        .await
        .expect_err("second create");

    assert!(matches!(err, ScheduleStoreError::AlreadyExists(id) if id == pricing_id));
}

#[tokio::test]
async fn test_other_agency_cannot_touch_schedule() {
    let db = setup_db().await;
    let repo = ScheduleRepository::new(db.clone(), RecordingAuditSink::new());
    let agency_id = Uuid::new_v4();
    let intruder = Uuid::new_v4();
    let (_, pricing_id) = priced_activity(&db, agency_id, Some(TOTAL)).await;

    let err = repo
        .create(intruder, &actor(), installments(pricing_id, vec![item("Full", TOTAL, 30)]))
        .await
        .expect_err("foreign activity");
    assert!(matches!(err, ScheduleStoreError::ActivityNotFound(_)));

    repo.create(agency_id, &actor(), installments(pricing_id, vec![item("Full", TOTAL, 30)]))
        .await
        .expect("owner create");
    let err = repo
        .get(pricing_id, intruder)
        .await
        .expect_err("foreign schedule");
    assert!(matches!(err, ScheduleStoreError::ScheduleNotFound(_)));
}

#[tokio::test]
async fn test_guarantee_schedule_requires_card_details() {
    let db = setup_db().await;
    let repo = ScheduleRepository::new(db.clone(), RecordingAuditSink::new());
    let agency_id = Uuid::new_v4();
    let (_, pricing_id) = priced_activity(&db, agency_id, Some(TOTAL)).await;

    let mut input = CreateScheduleInput {
        activity_pricing_id: pricing_id,
        schedule_type: ScheduleType::Guarantee,
        allow_partial_payments: false,
        deposit: None,
        items: None,
        guarantee: None,
    };
    let err = repo
        .create(agency_id, &actor(), input.clone())
        .await
        .expect_err("missing guarantee");
    assert!(matches!(
        err,
        ScheduleStoreError::Validation(ScheduleError::GuaranteeRequired)
    ));

    input.guarantee = Some(GuaranteeInput {
        card_holder_name: "Ana Ferreira".to_string(),
        last_four: "4242".to_string(),
        authorization_code: Some("AUTH77".to_string()),
        authorization_date: Some(today()),
        authorization_amount_cents: Some(TOTAL),
    });
    let schedule = repo
        .create(agency_id, &actor(), input)
        .await
        .expect("create guarantee schedule");

    let guarantee = schedule.guarantee.expect("guarantee stored");
    assert_eq!(guarantee.last_four, "4242");
    assert!(schedule.items.is_empty());
}

#[tokio::test]
async fn test_deposit_percentage_round_trips() {
    let db = setup_db().await;
    let repo = ScheduleRepository::new(db.clone(), RecordingAuditSink::new());
    let agency_id = Uuid::new_v4();
    let (_, pricing_id) = priced_activity(&db, agency_id, Some(TOTAL)).await;

    let schedule = repo
        .create(
            agency_id,
            &actor(),
            CreateScheduleInput {
                activity_pricing_id: pricing_id,
                schedule_type: ScheduleType::Deposit,
                allow_partial_payments: true,
                deposit: Some(DepositSpec::Percentage(dec!(12.5))),
                items: None,
                guarantee: None,
            },
        )
        .await
        .expect("create deposit schedule");

    assert_eq!(
        schedule.config.deposit,
        Some(DepositSpec::Percentage(dec!(12.5)))
    );
}

// ============================================================================
// Update
// ============================================================================

#[tokio::test]
async fn test_replacing_items_discards_their_transactions() {
    let db = setup_db().await;
    let audit = RecordingAuditSink::new();
    let repo = ScheduleRepository::new(db.clone(), audit.clone());
    let ledger = TransactionRepository::new(db.clone(), audit.clone());
    let agency_id = Uuid::new_v4();
    let (_, pricing_id) = priced_activity(&db, agency_id, Some(TOTAL)).await;

    let schedule = repo
        .create(
            agency_id,
            &actor(),
            installments(pricing_id, vec![item("Full", TOTAL, 30)]),
        )
        .await
        .expect("create schedule");
    ledger
        .create(agency_id, &actor(), payment(schedule.items[0].id, 50_000))
        .await
        .expect("record payment");

    let updated = repo
        .update(
            pricing_id,
            agency_id,
            &actor(),
            UpdateScheduleInput {
                items: Some(vec![item("First", 120_000, 20), item("Second", 80_000, 60)]),
                ..UpdateScheduleInput::default()
            },
        )
        .await
        .expect("update schedule");

    assert_eq!(updated.config.id, schedule.config.id);
    assert_eq!(updated.items.len(), 2);
    assert!(updated.items.iter().all(|i| i.paid_amount_cents == 0));
    let transactions = payment_transactions::Entity::find()
        .count(&db)
        .await
        .expect("count transactions");
    assert_eq!(transactions, 0);

    let last = audit.entries().pop().expect("audit entry");
    assert_eq!(last.action, AuditAction::Updated);
    assert!(last.old_values.is_some());
}

#[tokio::test]
async fn test_update_keeps_unspecified_settings() {
    let db = setup_db().await;
    let repo = ScheduleRepository::new(db.clone(), RecordingAuditSink::new());
    let agency_id = Uuid::new_v4();
    let (_, pricing_id) = priced_activity(&db, agency_id, Some(TOTAL)).await;

    repo.create(
        agency_id,
        &actor(),
        installments(pricing_id, vec![item("Full", TOTAL, 30)]),
    )
    .await
    .expect("create schedule");

    let updated = repo
        .update(
            pricing_id,
            agency_id,
            &actor(),
            UpdateScheduleInput {
                allow_partial_payments: Some(false),
                ..UpdateScheduleInput::default()
            },
        )
        .await
        .expect("update schedule");

    assert_eq!(updated.config.schedule_type, ScheduleType::Installments);
    assert!(!updated.config.allow_partial_payments);
    assert_eq!(updated.items.len(), 1);
}

// ============================================================================
// Template application
// ============================================================================

#[tokio::test]
async fn test_apply_template_resolves_items() {
    let db = setup_db().await;
    let audit = RecordingAuditSink::new();
    let templates = TemplateRepository::new(db.clone(), audit.clone());
    let repo = ScheduleRepository::new(db.clone(), audit.clone());
    let agency_id = Uuid::new_v4();
    let (_, pricing_id) = priced_activity(&db, agency_id, Some(TOTAL)).await;

    let template = templates
        .create(agency_id, &actor(), template_input(dec!(25), 60))
        .await
        .expect("create template");

    let applied = repo
        .apply_template(pricing_id, agency_id, &actor(), apply_input(template.id))
        .await
        .expect("apply template");

    assert!(applied.warnings.is_empty());
    let schedule = applied.schedule;
    assert_eq!(schedule.config.schedule_type, ScheduleType::Deposit);
    assert_eq!(schedule.config.template_id, Some(template.id));
    assert_eq!(schedule.config.template_version, Some(1));
    assert_eq!(
        schedule.config.deposit,
        Some(DepositSpec::Percentage(dec!(25)))
    );
    assert!(schedule.config.allow_partial_payments);

    let amounts: Vec<i64> = schedule.items.iter().map(|i| i.expected_amount_cents).collect();
    assert_eq!(amounts, [50_000, 150_000]);
    assert_eq!(schedule.items[0].due_date, Some(today()));
    assert_eq!(schedule.items[1].due_date, Some(days_from_today(120)));

    let last = audit.entries().pop().expect("audit entry");
    assert_eq!(last.action, AuditAction::TemplateApplied);
}

#[tokio::test]
async fn test_apply_template_returns_warnings() {
    let db = setup_db().await;
    let templates = TemplateRepository::new(db.clone(), RecordingAuditSink::new());
    let repo = ScheduleRepository::new(db.clone(), RecordingAuditSink::new());
    let agency_id = Uuid::new_v4();
    let (_, pricing_id) = priced_activity(&db, agency_id, Some(TOTAL)).await;

    let template = templates
        .create(agency_id, &actor(), template_input(dec!(60), 60))
        .await
        .expect("create template");

    let applied = repo
        .apply_template(pricing_id, agency_id, &actor(), apply_input(template.id))
        .await
        .expect("apply template");

    let codes: Vec<TicoIssueCode> = applied.warnings.iter().map(|w| w.code).collect();
    assert_eq!(codes, [TicoIssueCode::HighDeposit]);
}

#[tokio::test]
async fn test_apply_template_blocked_by_compliance() {
    let db = setup_db().await;
    let templates = TemplateRepository::new(db.clone(), RecordingAuditSink::new());
    let repo = ScheduleRepository::new(db.clone(), RecordingAuditSink::new());
    let agency_id = Uuid::new_v4();
    let (_, pricing_id) = priced_activity(&db, agency_id, Some(TOTAL)).await;

    let template = templates
        .create(agency_id, &actor(), template_input(dec!(25), 30))
        .await
        .expect("create template");

    let err = repo
        .apply_template(pricing_id, agency_id, &actor(), apply_input(template.id))
        .await
        .expect_err("final payment too close to departure");

    let ScheduleStoreError::Validation(ScheduleError::TicoValidationFailed { report }) = err else {
        panic!("expected compliance failure");
    };
    assert_eq!(report.errors[0].code, TicoIssueCode::FinalPaymentTooLate);

    let items = expected_payment_items::Entity::find()
        .count(&db)
        .await
        .expect("count items");
    assert_eq!(items, 0);
}

#[tokio::test]
async fn test_apply_template_replaces_existing_items() {
    let db = setup_db().await;
    let templates = TemplateRepository::new(db.clone(), RecordingAuditSink::new());
    let repo = ScheduleRepository::new(db.clone(), RecordingAuditSink::new());
    let agency_id = Uuid::new_v4();
    let (_, pricing_id) = priced_activity(&db, agency_id, Some(TOTAL)).await;

    let existing = repo
        .create(
            agency_id,
            &actor(),
            installments(
                pricing_id,
                vec![
                    item("One", 50_000, 10),
                    item("Two", 50_000, 20),
                    item("Three", 100_000, 30),
                ],
            ),
        )
        .await
        .expect("create schedule");
    let template = templates
        .create(agency_id, &actor(), template_input(dec!(25), 60))
        .await
        .expect("create template");

    let applied = repo
        .apply_template(pricing_id, agency_id, &actor(), apply_input(template.id))
        .await
        .expect("apply template");

    assert_eq!(applied.schedule.config.id, existing.config.id);
    assert_eq!(applied.schedule.items.len(), 2);
    let stored = expected_payment_items::Entity::find()
        .count(&db)
        .await
        .expect("count items");
    assert_eq!(stored, 2);
}

#[tokio::test]
async fn test_apply_rejects_inactive_template_and_wrong_total() {
    let db = setup_db().await;
    let templates = TemplateRepository::new(db.clone(), RecordingAuditSink::new());
    let repo = ScheduleRepository::new(db.clone(), RecordingAuditSink::new());
    let agency_id = Uuid::new_v4();
    let (_, pricing_id) = priced_activity(&db, agency_id, Some(TOTAL)).await;

    let template = templates
        .create(agency_id, &actor(), template_input(dec!(25), 60))
        .await
        .expect("create template");

    let mut input = apply_input(template.id);
    input.total_amount_cents = TOTAL - 1;
    let err = repo
        .apply_template(pricing_id, agency_id, &actor(), input)
        .await
        .expect_err("total mismatch");
    assert!(matches!(
        err,
        ScheduleStoreError::Validation(ScheduleError::TemplateTotalMismatch { .. })
    ));

    templates
        .update(
            template.id,
            agency_id,
            &actor(),
            UpdateTemplateInput {
                is_active: Some(false),
                ..UpdateTemplateInput::default()
            },
        )
        .await
        .expect("deactivate");
    let err = repo
        .apply_template(pricing_id, agency_id, &actor(), apply_input(template.id))
        .await
        .expect_err("inactive template");
    assert!(matches!(err, ScheduleStoreError::TemplateNotFound(id) if id == template.id));
}

// ============================================================================
// Items and delete
// ============================================================================

#[tokio::test]
async fn test_update_item_must_keep_schedule_sum() {
    let db = setup_db().await;
    let audit = RecordingAuditSink::new();
    let repo = ScheduleRepository::new(db.clone(), audit.clone());
    let agency_id = Uuid::new_v4();
    let (_, pricing_id) = priced_activity(&db, agency_id, Some(TOTAL)).await;

    let schedule = repo
        .create(
            agency_id,
            &actor(),
            installments(
                pricing_id,
                vec![item("First", 100_000, 30), item("Second", 100_000, 90)],
            ),
        )
        .await
        .expect("create schedule");
    let first = &schedule.items[0];

    let err = repo
        .update_item(
            first.id,
            agency_id,
            &actor(),
            ItemPatch {
                expected_amount_cents: Some(90_000),
                ..ItemPatch::default()
            },
        )
        .await
        .expect_err("sum would drift");
    assert!(matches!(
        err,
        ScheduleStoreError::Validation(ScheduleError::SumMismatch { .. })
    ));

    let renamed = repo
        .update_item(
            first.id,
            agency_id,
            &actor(),
            ItemPatch {
                payment_name: Some("  Deposit ".to_string()),
                due_date: Some(Some(days_from_today(14))),
                ..ItemPatch::default()
            },
        )
        .await
        .expect("rename item");
    assert_eq!(renamed.payment_name, "Deposit");
    assert_eq!(renamed.due_date, Some(days_from_today(14)));
    assert_eq!(renamed.expected_amount_cents, 100_000);

    let last = audit.entries().pop().expect("audit entry");
    assert_eq!(last.entity_type, AuditEntityType::Item);
    assert_eq!(last.action, AuditAction::Updated);
}

#[tokio::test]
async fn test_update_item_status_is_audited() {
    let db = setup_db().await;
    let audit = RecordingAuditSink::new();
    let repo = ScheduleRepository::new(db.clone(), audit.clone());
    let agency_id = Uuid::new_v4();
    let (_, pricing_id) = priced_activity(&db, agency_id, Some(TOTAL)).await;

    let schedule = repo
        .create(
            agency_id,
            &actor(),
            installments(pricing_id, vec![item("Full", TOTAL, 30)]),
        )
        .await
        .expect("create schedule");

    let item = repo
        .update_item_status(
            schedule.items[0].id,
            agency_id,
            &actor(),
            PaymentStatus::Overdue,
        )
        .await
        .expect("change status");
    assert_eq!(item.status, PaymentStatus::Overdue);

    let last = audit.entries().pop().expect("audit entry");
    assert_eq!(last.action, AuditAction::StatusChanged);
    assert_eq!(
        last.new_values,
        Some(serde_json::json!({ "status": "overdue" }))
    );

    let err = repo
        .update_item_status(Uuid::new_v4(), agency_id, &actor(), PaymentStatus::Paid)
        .await
        .expect_err("unknown item");
    assert!(matches!(err, ScheduleStoreError::ItemNotFound(_)));
}

#[tokio::test]
async fn test_delete_refused_while_transactions_exist() {
    let db = setup_db().await;
    let audit = RecordingAuditSink::new();
    let repo = ScheduleRepository::new(db.clone(), audit.clone());
    let ledger = TransactionRepository::new(db.clone(), audit.clone());
    let agency_id = Uuid::new_v4();
    let (_, pricing_id) = priced_activity(&db, agency_id, Some(TOTAL)).await;

    let schedule = repo
        .create(
            agency_id,
            &actor(),
            installments(pricing_id, vec![item("Full", TOTAL, 30)]),
        )
        .await
        .expect("create schedule");
    let outcome = ledger
        .create(agency_id, &actor(), payment(schedule.items[0].id, 1_000))
        .await
        .expect("record payment");

    let err = repo
        .delete(pricing_id, agency_id, &actor())
        .await
        .expect_err("has transactions");
    assert!(matches!(err, ScheduleStoreError::HasTransactions(_)));

    ledger
        .delete(outcome.transaction.id, agency_id, &actor())
        .await
        .expect("delete payment");
    repo.delete(pricing_id, agency_id, &actor())
        .await
        .expect("delete schedule");

    let err = repo
        .get(pricing_id, agency_id)
        .await
        .expect_err("schedule gone");
    assert!(matches!(err, ScheduleStoreError::ScheduleNotFound(_)));
}
