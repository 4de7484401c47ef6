mod common;

use common::{MockCompute, harness, small_size};
use serde_json::json;
use strato_cloud::CloudError;
use strato_provision::ProvisionError;

async fn create_one(h: &common::Harness) -> String {
    h.manager
        .create(
            "agent-1",
            "stemcell-1",
            &small_size(),
            &json!({"default": {"type": "dynamic"}}),
            &[],
            None,
        )
        .await
        .unwrap()
}

#[tokio::test]
async fn test_terminate_waits_until_gone() {
    let h = harness(MockCompute::new().with_stopping_polls(2));

    let instance_id = create_one(&h).await;
    assert!(h.registry.contains(&instance_id).await);

    h.manager.terminate(&instance_id).await.unwrap();

    assert_eq!(h.compute.terminate_calls(), vec![instance_id.clone()]);
    assert!(!h.registry.contains(&instance_id).await);
}

#[tokio::test]
async fn test_terminate_treats_vanished_instance_as_success() {
    let h = harness(
        MockCompute::new()
            .with_stopping_polls(1)
            .with_vanish_after_shutdown(),
    );

    let instance_id = create_one(&h).await;
    h.manager.terminate(&instance_id).await.unwrap();
    assert!(!h.registry.contains(&instance_id).await);
}

#[tokio::test]
async fn test_terminate_twice_is_idempotent() {
    let h = harness(MockCompute::new().with_vanish_after_shutdown());

    let instance_id = create_one(&h).await;
    h.manager.terminate(&instance_id).await.unwrap();
    // The second call hits a provider that no longer knows the id.
    h.manager.terminate(&instance_id).await.unwrap();

    assert!(!h.registry.contains(&instance_id).await);
    assert_eq!(h.compute.terminate_calls().len(), 2);
}

#[tokio::test]
async fn test_terminate_of_unknown_instance_succeeds() {
    let h = harness(MockCompute::new());

    h.manager.terminate("i-neverexisted").await.unwrap();
    assert_eq!(h.registry.len().await, 0);
}

#[tokio::test]
async fn test_terminate_deletes_settings_even_when_poll_fails() {
    let h = harness(MockCompute::new());

    let instance_id = create_one(&h).await;
    assert!(h.registry.contains(&instance_id).await);

    h.compute.poison_shutdown_poll();
    let err = h.manager.terminate(&instance_id).await.unwrap_err();

    assert!(matches!(
        err,
        ProvisionError::Cloud(CloudError::Unhandled(_))
    ));
    // Best-effort cleanup: settings are gone despite the surfaced error.
    assert!(!h.registry.contains(&instance_id).await);
}

#[tokio::test]
async fn test_reboot_issues_a_single_call() {
    let h = harness(MockCompute::new());

    let instance_id = create_one(&h).await;
    h.manager.reboot(&instance_id).await.unwrap();

    assert_eq!(h.compute.reboots(), vec![instance_id.clone()]);
    // Reboot does not touch the registry.
    assert!(h.registry.contains(&instance_id).await);
}

#[tokio::test]
async fn test_reboot_of_unknown_instance_surfaces_the_error() {
    let h = harness(MockCompute::new());

    let err = h.manager.reboot("i-neverexisted").await.unwrap_err();
    assert!(matches!(
        err,
        ProvisionError::Cloud(CloudError::ResourceMissing(_))
    ));
}
