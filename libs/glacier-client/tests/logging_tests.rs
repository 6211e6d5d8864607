//! Log levels emitted by failing vault operations.

use glacier_client::{GlacierClient, GlacierConfig, RawResponse};
use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};
use test_utils::{
    FakeGlacier,
    fixtures::{TEST_ACCESS_KEY_ID, TEST_REGION, TEST_SECRET_ACCESS_KEY, error_body},
};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::{
    Layer,
    layer::{Context, SubscriberExt},
};

#[derive(Clone, Default)]
struct WarnCounter {
    warnings: Arc<AtomicUsize>,
}

impl WarnCounter {
    fn count(&self) -> usize {
        self.warnings.load(Ordering::SeqCst)
    }
}

impl<S: Subscriber> Layer<S> for WarnCounter {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        if *event.metadata().level() == Level::WARN {
            self.warnings.fetch_add(1, Ordering::SeqCst);
        }
    }
}

fn client(fake: &FakeGlacier) -> GlacierClient {
    let config = GlacierConfig::new(TEST_REGION, TEST_ACCESS_KEY_ID, TEST_SECRET_ACCESS_KEY);
    GlacierClient::with_transport(config, fake.clone()).unwrap()
}

fn warnings_during<F: std::future::Future>(future: F) -> (F::Output, usize) {
    let counter = WarnCounter::default();
    let subscriber = tracing_subscriber::registry().with(counter.clone());
    let output = tracing::subscriber::with_default(subscriber, || tokio_test::block_on(future));
    (output, counter.count())
}

#[test]
fn test_service_error_is_warned_once() {
    let fake = FakeGlacier::new();
    let client = client(&fake);

    let (description, warnings) = warnings_during(client.describe_vault("missing"));

    assert!(description.is_none());
    assert_eq!(warnings, 1);
}

#[test]
fn test_server_error_on_create_is_warned_once() {
    let fake = FakeGlacier::new();
    let client = client(&fake);
    tokio_test::block_on(fake.respond_next_with(RawResponse::new(
        500,
        error_body("ServiceUnavailableException", "try later", "Server").to_string(),
    )));

    let (created, warnings) = warnings_during(client.create_vault("busy"));

    assert!(!created);
    assert_eq!(warnings, 1);
}

#[test]
fn test_rejected_input_is_not_warned() {
    let fake = FakeGlacier::new();
    let client = client(&fake);

    let (listed, warnings) = warnings_during(client.list_vaults(0, None));

    assert!(listed.is_none());
    assert_eq!(warnings, 0);
}

#[test]
fn test_success_is_not_warned() {
    let fake = FakeGlacier::new();
    let client = client(&fake);

    let (created, warnings) = warnings_during(client.create_vault("quiet"));

    assert!(created);
    assert_eq!(warnings, 0);
}
