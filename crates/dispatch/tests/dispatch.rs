//! End-to-end dispatch scenarios with the real push and SMS adapters,
//! in-memory boundary doubles, and no network.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::Mutex;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use uuid::Uuid;

use huddle_common::error::AppError;
use huddle_common::types::{
    ChannelKind, Notification, NotificationFilter, NotificationType, RecipientContact,
    StoredNotification,
};
use huddle_dispatch::channel::ChannelSender;
use huddle_dispatch::directory::RecipientDirectory;
use huddle_dispatch::dispatcher::Dispatcher;
use huddle_dispatch::push::{PushBatch, PushGateway, PushSender};
use huddle_dispatch::sms::{SmsGateway, SmsSender};
use huddle_dispatch::store::NotificationStore;

// ============================================================
// Boundary doubles
// ============================================================

struct MemoryStore {
    saves: AtomicUsize,
}

impl MemoryStore {
    fn new() -> Self {
        Self {
            saves: AtomicUsize::new(0),
        }
    }
}

#[async_trait]
impl NotificationStore for MemoryStore {
    async fn save(&self, _notification: &Notification) -> Result<Uuid, AppError> {
        self.saves.fetch_add(1, Ordering::SeqCst);
        Ok(Uuid::new_v4())
    }

    async fn list(
        &self,
        _filter: &NotificationFilter,
    ) -> Result<Vec<StoredNotification>, AppError> {
        Ok(Vec::new())
    }
}

struct MemoryDirectory {
    contacts: HashMap<String, RecipientContact>,
}

impl MemoryDirectory {
    fn new(contacts: &[(&str, Option<&str>, Option<&str>)]) -> Self {
        Self {
            contacts: contacts
                .iter()
                .map(|(id, token, phone)| {
                    (
                        id.to_string(),
                        RecipientContact {
                            push_token: token.map(String::from),
                            phone_number: phone.map(String::from),
                        },
                    )
                })
                .collect(),
        }
    }
}

#[async_trait]
impl RecipientDirectory for MemoryDirectory {
    async fn resolve(
        &self,
        ids: &[String],
    ) -> Result<HashMap<String, RecipientContact>, AppError> {
        Ok(ids
            .iter()
            .filter_map(|id| self.contacts.get(id).map(|c| (id.clone(), c.clone())))
            .collect())
    }
}

#[derive(Default)]
struct CapturingPushGateway {
    batches: Mutex<Vec<PushBatch>>,
}

#[async_trait]
impl PushGateway for CapturingPushGateway {
    async fn send_batch(&self, batch: &PushBatch) -> anyhow::Result<()> {
        self.batches.lock().unwrap().push(batch.clone());
        Ok(())
    }
}

#[derive(Default)]
struct CapturingSmsGateway {
    calls: Mutex<Vec<(String, String)>>,
}

#[async_trait]
impl SmsGateway for CapturingSmsGateway {
    async fn send(&self, message: &str, phone_number: &str) -> anyhow::Result<()> {
        self.calls
            .lock()
            .unwrap()
            .push((message.to_string(), phone_number.to_string()));
        Ok(())
    }
}

fn build_dispatcher(
    directory: MemoryDirectory,
    push_gateway: Arc<CapturingPushGateway>,
    sms_gateway: Arc<CapturingSmsGateway>,
) -> Dispatcher {
    let senders: Vec<Arc<dyn ChannelSender>> = vec![
        Arc::new(PushSender::new(push_gateway)),
        Arc::new(SmsSender::new(sms_gateway)),
    ];
    Dispatcher::new(Arc::new(MemoryStore::new()), Arc::new(directory), senders)
}

fn notification(
    notification_type: NotificationType,
    channels: &[ChannelKind],
    recipients: &[&str],
    sms_message: &str,
) -> Notification {
    Notification {
        notification_type,
        channels: channels.iter().copied().collect::<BTreeSet<_>>(),
        recipients: recipients.iter().map(|s| s.to_string()).collect(),
        title: "T".to_string(),
        body: "B".to_string(),
        sms_message: sms_message.to_string(),
        data: BTreeMap::new(),
    }
}

// ============================================================
// Scenarios
// ============================================================

#[tokio::test]
async fn push_to_two_recipients_one_without_token() {
    let push_gateway = Arc::new(CapturingPushGateway::default());
    let sms_gateway = Arc::new(CapturingSmsGateway::default());
    let directory = MemoryDirectory::new(&[
        ("U1", Some("ExponentPushToken[tok-1]"), None),
        ("U2", None, None),
    ]);
    let dispatcher = build_dispatcher(directory, push_gateway.clone(), sms_gateway);

    let outcome = dispatcher
        .dispatch(&notification(
            NotificationType::ExpenseCreated,
            &[ChannelKind::Push],
            &["U1", "U2"],
            "",
        ))
        .await
        .unwrap();

    assert_eq!(
        serde_json::to_value(&outcome.errors).unwrap(),
        serde_json::json!({ "push": { "U2": "failed to get push token" } })
    );

    let batches = push_gateway.batches.lock().unwrap();
    assert_eq!(batches.len(), 1);
    assert_eq!(batches[0].to, vec!["ExponentPushToken[tok-1]"]);
}

#[tokio::test]
async fn sms_to_one_recipient_succeeds() {
    let push_gateway = Arc::new(CapturingPushGateway::default());
    let sms_gateway = Arc::new(CapturingSmsGateway::default());
    let directory = MemoryDirectory::new(&[("U1", None, Some("555-0100"))]);
    let dispatcher = build_dispatcher(directory, push_gateway, sms_gateway.clone());

    let outcome = dispatcher
        .dispatch(&notification(
            NotificationType::Generic,
            &[ChannelKind::Sms],
            &["U1"],
            "hello",
        ))
        .await
        .unwrap();

    assert!(outcome.errors.is_empty());
    assert_eq!(
        serde_json::to_value(&outcome.errors).unwrap(),
        serde_json::json!({})
    );

    let calls = sms_gateway.calls.lock().unwrap();
    assert_eq!(*calls, vec![("hello".to_string(), "555-0100".to_string())]);
}

#[tokio::test]
async fn empty_sms_message_suppresses_the_channel() {
    let push_gateway = Arc::new(CapturingPushGateway::default());
    let sms_gateway = Arc::new(CapturingSmsGateway::default());
    let directory = MemoryDirectory::new(&[("U1", None, Some("555-0100"))]);
    let dispatcher = build_dispatcher(directory, push_gateway, sms_gateway.clone());

    let outcome = dispatcher
        .dispatch(&notification(
            NotificationType::Generic,
            &[ChannelKind::Sms],
            &["U1"],
            "",
        ))
        .await
        .unwrap();

    // Valid no-op: nothing sent, nothing reported
    assert!(outcome.errors.is_empty());
    assert!(sms_gateway.calls.lock().unwrap().is_empty());
}

#[tokio::test]
async fn both_channels_fan_out_independently() {
    let push_gateway = Arc::new(CapturingPushGateway::default());
    let sms_gateway = Arc::new(CapturingSmsGateway::default());
    let directory = MemoryDirectory::new(&[
        ("U1", Some("ExponentPushToken[tok-1]"), Some("555-0100")),
        ("U2", None, Some("")),
    ]);
    let dispatcher = build_dispatcher(directory, push_gateway.clone(), sms_gateway.clone());

    let outcome = dispatcher
        .dispatch(&notification(
            NotificationType::EventUpdated,
            &[ChannelKind::Push, ChannelKind::Sms],
            &["U1", "U2"],
            "the plan changed",
        ))
        .await
        .unwrap();

    // U2 has no push token: reported under push only. U2's empty phone
    // number is skipped silently, so the sms key never appears.
    assert_eq!(
        serde_json::to_value(&outcome.errors).unwrap(),
        serde_json::json!({ "push": { "U2": "failed to get push token" } })
    );
    assert_eq!(push_gateway.batches.lock().unwrap().len(), 1);
    assert_eq!(
        *sms_gateway.calls.lock().unwrap(),
        vec![("the plan changed".to_string(), "555-0100".to_string())]
    );
}
