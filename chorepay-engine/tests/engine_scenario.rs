//! End-to-end scenario: seed from config, assign a chore to every child,
//! submit with photo proof, clarify, approve, and persist.

use chorepay_engine::{AppConfig, FileStore, NewTask, ProofSubmission, Store, TaskPatch};
use chorepay_shared::domain::{Money, Sender, StreakRule, TaskStatus};
use chorepay_shared::proof;
use chrono::{NaiveDate, NaiveDateTime};

const CONFIG: &str = r#"
parent:
  name: Papá/Mamá
  pin: "1234"
children:
  - name: Alice
    avatar: "🚀"
  - name: Bob
    avatar: "🦖"
language: es
"#;

fn seeded_store() -> Store {
    let cfg = AppConfig::from_yaml(CONFIG).expect("config");
    let mut store = Store::new();
    store.seed_from_config(&cfg).expect("seed");
    store
}

/// Minimal little-endian TIFF carrying one DateTimeOriginal tag. The
/// capture time is an Exif-context tag, so it lives in an Exif sub-IFD
/// (reached from IFD0 via the 0x8769 pointer) the way a real camera
/// writes it; placed bare in IFD0 the reader would file it under the
/// wrong context and `Tag::DateTimeOriginal` would not find it.
fn photo_taken_at(ascii: &str) -> Vec<u8> {
    let mut text = ascii.as_bytes().to_vec();
    text.push(0);
    let exif_ifd_start = 26u32; // header(8) + IFD0 count/entry/next(18)
    let data_start = exif_ifd_start + 18; // Exif IFD count/entry/next(18)
    let mut out = vec![0x49, 0x49, 0x2a, 0x00];
    out.extend_from_slice(&8u32.to_le_bytes()); // IFD0 offset
    // IFD0: one entry, the Exif sub-IFD pointer.
    out.extend_from_slice(&1u16.to_le_bytes());
    out.extend_from_slice(&0x8769u16.to_le_bytes()); // ExifIFDPointer
    out.extend_from_slice(&4u16.to_le_bytes()); // LONG
    out.extend_from_slice(&1u32.to_le_bytes());
    out.extend_from_slice(&exif_ifd_start.to_le_bytes());
    out.extend_from_slice(&0u32.to_le_bytes()); // no next IFD
    // Exif sub-IFD: one DateTimeOriginal entry.
    out.extend_from_slice(&1u16.to_le_bytes());
    out.extend_from_slice(&0x9003u16.to_le_bytes());
    out.extend_from_slice(&2u16.to_le_bytes());
    out.extend_from_slice(&(text.len() as u32).to_le_bytes());
    out.extend_from_slice(&data_start.to_le_bytes());
    out.extend_from_slice(&0u32.to_le_bytes()); // no next IFD
    out.extend(text);
    out
}

fn at(h: u32, m: u32, s: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 3, 15)
        .unwrap()
        .and_hms_opt(h, m, s)
        .unwrap()
}

#[test]
fn full_chore_lifecycle_pays_out_once() {
    let mut store = seeded_store();
    assert!(store.verify_parent_pin("1234"));
    let parent_id = store.parent().unwrap().id.clone();
    let children: Vec<_> = store.children().map(|c| c.id.clone()).collect();
    assert_eq!(children.len(), 2);

    // One copy of the chore per child, each independently owned.
    let mut draft = NewTask::new("Hacer la cama", children[0].clone(), parent_id);
    draft.rewards.money = Some(Money(100));
    draft.streak = Some(StreakRule {
        days_required: 2,
        bonus: Some(Money(50)),
        bonus_item: None,
    });
    let created = store.create_task_for_all_children(draft).unwrap();
    assert_eq!(created.len(), 2);

    // Alice submits with a fresh photo.
    let alice_task = &created[0];
    let check = proof::validate_photo_timestamp_at(
        &photo_taken_at("2024:03:15 11:57:00"),
        proof::DEFAULT_MAX_AGE_MINUTES,
        at(12, 0, 0),
    );
    assert!(check.is_valid);
    store
        .complete_task(
            alice_task,
            ProofSubmission::with_photo(
                Some("¡Ya está!".to_string()),
                "data:image/jpeg;base64,...",
                &check,
            ),
        )
        .unwrap();
    let task = store.task(alice_task).unwrap();
    assert_eq!(task.status, TaskStatus::WaitingApproval);
    assert!(!task.fraud_warning);
    assert_eq!(store.tasks_awaiting_approval().len(), 1);

    // Parent asks for detail before approving; the child replies.
    store
        .request_clarification(alice_task, "¿Y la almohada?")
        .unwrap();
    assert!(store.task(alice_task).unwrap().needs_response);
    store
        .post_message(alice_task, Sender::Child, "También")
        .unwrap();
    assert!(!store.task(alice_task).unwrap().needs_response);

    // Approval settles money + streak bonus + xp, exactly once.
    store.validate_task(alice_task, true).unwrap();
    let alice = store.child(&children[0]).unwrap();
    assert_eq!(alice.balance, Money(150));
    assert_eq!(alice.xp, 10);
    assert_eq!(store.task(alice_task).unwrap().status, TaskStatus::Completed);
    store.validate_task(alice_task, true).unwrap_err();

    // Bob's copy is rejected: no settlement, and the rejection is final
    // unless the parent explicitly reopens it.
    let bob_task = &created[1];
    store
        .complete_task(bob_task, ProofSubmission::text("hecho"))
        .unwrap();
    store.validate_task(bob_task, false).unwrap();
    assert_eq!(store.child(&children[1]).unwrap().balance, Money::zero());
    store.validate_task(bob_task, false).unwrap_err();
    store
        .edit_task(
            bob_task,
            TaskPatch {
                status: Some(TaskStatus::Pending),
                ..TaskPatch::default()
            },
        )
        .unwrap();
    assert_eq!(store.task(bob_task).unwrap().status, TaskStatus::Pending);
}

#[test]
fn stale_photo_raises_the_fraud_flag_but_never_blocks() {
    let mut store = seeded_store();
    let children: Vec<_> = store.children().map(|c| c.id.clone()).collect();
    let parent_id = store.parent().unwrap().id.clone();
    let task = store
        .create_task(NewTask::new(
            "Pasear al perro",
            children[0].clone(),
            parent_id,
        ))
        .unwrap();

    // Taken two hours before submission.
    let check = proof::validate_photo_timestamp_at(
        &photo_taken_at("2024:03:15 10:00:00"),
        proof::DEFAULT_MAX_AGE_MINUTES,
        at(12, 0, 0),
    );
    assert!(check.fraud_warning());
    assert_eq!(check.minutes_difference, Some(120));

    store
        .complete_task(
            &task,
            ProofSubmission::with_photo(None, "data:image/jpeg;base64,...", &check),
        )
        .unwrap();
    let stored = store.task(&task).unwrap();
    assert_eq!(stored.status, TaskStatus::WaitingApproval);
    assert!(stored.fraud_warning);

    // An unverifiable photo is submitted unflagged.
    let check = proof::validate_photo_timestamp_at(
        b"no exif here",
        proof::DEFAULT_MAX_AGE_MINUTES,
        at(12, 0, 0),
    );
    assert!(check.error.is_some());
    assert!(!check.fraud_warning());
}

#[test]
fn cascade_delete_and_persistence_round_trip() {
    let runtime = tokio::runtime::Runtime::new().unwrap();
    let mut store = seeded_store();
    let children: Vec<_> = store.children().map(|c| c.id.clone()).collect();
    let parent_id = store.parent().unwrap().id.clone();

    let mut draft = NewTask::new("Regar las plantas", children[0].clone(), parent_id);
    draft.selected_days = vec![0, 3]; // Mondays and Thursdays
    let created = store.create_task_for_all_children(draft).unwrap();
    assert_eq!(created.len(), 2);
    let monday = NaiveDate::from_ymd_opt(2024, 3, 11).unwrap();
    assert_eq!(store.tasks_on(monday).len(), 2);

    // Deleting Alice removes her copy and detaches her from the parent.
    store.delete_child(&children[0]).unwrap();
    assert_eq!(store.tasks().len(), 1);
    assert_eq!(
        store.parent().unwrap().children_ids,
        vec![children[1].clone()]
    );

    // The surviving state round-trips through the blob store.
    let dir = tempfile::tempdir().unwrap();
    let blob_store = FileStore::new(dir.path());
    runtime
        .block_on(blob_store.save(store.export_state()))
        .unwrap();
    let loaded = runtime.block_on(blob_store.load()).unwrap().unwrap();

    let mut restored = Store::new();
    restored.replace_state(loaded);
    assert_eq!(restored.tasks().len(), 1);
    assert_eq!(restored.tasks()[0].assigned_to, children[1]);
    assert!(restored.child(&children[1]).is_ok());
    assert!(restored.verify_parent_pin("1234"));
}
