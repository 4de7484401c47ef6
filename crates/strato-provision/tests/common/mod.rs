use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use strato_cloud::{
    CloudError, ComputeProvider, InstanceRequest, InstanceStatus, InstanceView, SubnetInfo,
    WaitConfig,
};
use strato_provision::{InstanceManager, MemoryRegistry, ProvisionConfig, SizeSpec, StaticCatalog};

#[allow(dead_code)]
pub const REGISTRY_ENDPOINT: &str = "http://registry.internal:25777";

/// In-process compute provider with scriptable eventual consistency.
///
/// Counters emulate the provider-side windows the orchestrator has to ride
/// out: `missing_polls` get-instance calls deny a fresh instance exists,
/// `pending_polls` report it pending, `stopping_polls` report a
/// terminating instance still stopping.
pub struct MockCompute {
    inner: Mutex<Inner>,
}

#[derive(Default)]
struct Inner {
    sequence: u32,
    instances: HashSet<String>,
    terminating: HashSet<String>,
    subnets: HashMap<String, SubnetInfo>,
    volume_zones: HashMap<String, Option<String>>,

    missing_polls: u32,
    pending_polls: u32,
    stopping_polls: u32,
    vanish_after_shutdown: bool,
    fail_shutdown_poll: bool,
    flaky_associations: u32,

    create_requests: Vec<InstanceRequest>,
    associations: Vec<(String, String)>,
    reboots: Vec<String>,
    terminate_calls: Vec<String>,
}

#[allow(dead_code)]
impl MockCompute {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Inner::default()),
        }
    }

    pub fn with_subnet(self, subnet_id: &str, zone: Option<&str>) -> Self {
        {
            let mut inner = self.inner.lock().unwrap();
            let mut info = SubnetInfo::new(subnet_id);
            if let Some(zone) = zone {
                info = info.with_availability_zone(zone);
            }
            inner.subnets.insert(subnet_id.to_string(), info);
        }
        self
    }

    pub fn with_volume_zone(self, volume_id: &str, zone: Option<&str>) -> Self {
        self.inner
            .lock()
            .unwrap()
            .volume_zones
            .insert(volume_id.to_string(), zone.map(String::from));
        self
    }

    /// Deny a fresh instance exists for the first `n` status probes
    pub fn with_missing_polls(self, n: u32) -> Self {
        self.inner.lock().unwrap().missing_polls = n;
        self
    }

    /// Report a fresh instance pending for `n` status probes
    pub fn with_pending_polls(self, n: u32) -> Self {
        self.inner.lock().unwrap().pending_polls = n;
        self
    }

    /// Report a terminating instance stopping for `n` status probes
    pub fn with_stopping_polls(self, n: u32) -> Self {
        self.inner.lock().unwrap().stopping_polls = n;
        self
    }

    /// After shutdown, report the instance missing instead of terminated
    pub fn with_vanish_after_shutdown(self) -> Self {
        self.inner.lock().unwrap().vanish_after_shutdown = true;
        self
    }

    /// Fail the first `n` address associations with a transient error
    pub fn with_flaky_associations(self, n: u32) -> Self {
        self.inner.lock().unwrap().flaky_associations = n;
        self
    }

    /// Make later probes of a terminating instance fail (set after create)
    pub fn poison_shutdown_poll(&self) {
        self.inner.lock().unwrap().fail_shutdown_poll = true;
    }

    pub fn create_requests(&self) -> Vec<InstanceRequest> {
        self.inner.lock().unwrap().create_requests.clone()
    }

    pub fn associations(&self) -> Vec<(String, String)> {
        self.inner.lock().unwrap().associations.clone()
    }

    pub fn reboots(&self) -> Vec<String> {
        self.inner.lock().unwrap().reboots.clone()
    }

    pub fn terminate_calls(&self) -> Vec<String> {
        self.inner.lock().unwrap().terminate_calls.clone()
    }
}

#[async_trait]
impl ComputeProvider for MockCompute {
    fn name(&self) -> &str {
        "mock"
    }

    async fn create_instance(&self, request: &InstanceRequest) -> strato_cloud::Result<String> {
        let mut inner = self.inner.lock().unwrap();
        inner.sequence += 1;
        let id = format!("i-{:07x}", inner.sequence);
        inner.instances.insert(id.clone());
        inner.create_requests.push(request.clone());
        Ok(id)
    }

    async fn get_instance(&self, instance_id: &str) -> strato_cloud::Result<InstanceView> {
        let mut inner = self.inner.lock().unwrap();
        if !inner.instances.contains(instance_id) {
            return Err(CloudError::ResourceMissing(instance_id.to_string()));
        }

        if inner.terminating.contains(instance_id) {
            if inner.fail_shutdown_poll {
                return Err(CloudError::Unhandled(format!(
                    "status probe failed for {}",
                    instance_id
                )));
            }
            if inner.stopping_polls > 0 {
                inner.stopping_polls -= 1;
                return Ok(InstanceView::new(instance_id, InstanceStatus::Stopping));
            }
            if inner.vanish_after_shutdown {
                inner.instances.remove(instance_id);
                return Err(CloudError::ResourceMissing(instance_id.to_string()));
            }
            return Ok(InstanceView::new(instance_id, InstanceStatus::Terminated));
        }

        if inner.missing_polls > 0 {
            inner.missing_polls -= 1;
            return Err(CloudError::ResourceMissing(instance_id.to_string()));
        }
        if inner.pending_polls > 0 {
            inner.pending_polls -= 1;
            return Ok(InstanceView::new(instance_id, InstanceStatus::Pending));
        }
        Ok(InstanceView::new(instance_id, InstanceStatus::Running))
    }

    async fn terminate_instance(&self, instance_id: &str) -> strato_cloud::Result<()> {
        let mut inner = self.inner.lock().unwrap();
        inner.terminate_calls.push(instance_id.to_string());
        if !inner.instances.contains(instance_id) {
            return Err(CloudError::ResourceMissing(instance_id.to_string()));
        }
        inner.terminating.insert(instance_id.to_string());
        Ok(())
    }

    async fn reboot_instance(&self, instance_id: &str) -> strato_cloud::Result<()> {
        let mut inner = self.inner.lock().unwrap();
        if !inner.instances.contains(instance_id) {
            return Err(CloudError::ResourceMissing(instance_id.to_string()));
        }
        inner.reboots.push(instance_id.to_string());
        Ok(())
    }

    async fn associate_address(
        &self,
        instance_id: &str,
        address: &str,
    ) -> strato_cloud::Result<()> {
        let mut inner = self.inner.lock().unwrap();
        if inner.flaky_associations > 0 {
            inner.flaky_associations -= 1;
            return Err(CloudError::Transient("address service unavailable".to_string()));
        }
        inner
            .associations
            .push((instance_id.to_string(), address.to_string()));
        Ok(())
    }

    async fn lookup_subnet(&self, subnet_id: &str) -> strato_cloud::Result<SubnetInfo> {
        let inner = self.inner.lock().unwrap();
        inner
            .subnets
            .get(subnet_id)
            .cloned()
            .ok_or_else(|| CloudError::ResourceMissing(subnet_id.to_string()))
    }

    async fn lookup_volume_zone(&self, volume_id: &str) -> strato_cloud::Result<Option<String>> {
        let inner = self.inner.lock().unwrap();
        inner
            .volume_zones
            .get(volume_id)
            .cloned()
            .ok_or_else(|| CloudError::ResourceMissing(volume_id.to_string()))
    }
}

pub struct Harness {
    pub compute: Arc<MockCompute>,
    pub registry: Arc<MemoryRegistry>,
    pub manager: InstanceManager,
}

/// Polling budgets tuned so tests run in milliseconds
#[allow(dead_code)]
pub fn fast_config() -> ProvisionConfig {
    ProvisionConfig {
        default_key_name: None,
        create_wait: WaitConfig::fixed(10, 1),
        configure_wait: WaitConfig::fixed(5, 1),
        terminate_wait: WaitConfig::fixed(10, 1),
    }
}

pub fn harness(compute: MockCompute) -> Harness {
    harness_with_config(compute, fast_config())
}

#[allow(dead_code)]
pub fn harness_with_config(compute: MockCompute, config: ProvisionConfig) -> Harness {
    let compute = Arc::new(compute);
    let registry = Arc::new(MemoryRegistry::new(REGISTRY_ENDPOINT));
    let manager = InstanceManager::new(
        compute.clone(),
        registry.clone(),
        Arc::new(StaticCatalog::new().with_stemcell("stemcell-1", "/dev/sda1")),
        config,
    );
    Harness {
        compute,
        registry,
        manager,
    }
}

#[allow(dead_code)]
pub fn small_size() -> SizeSpec {
    SizeSpec {
        instance_type: "m1.small".to_string(),
        key_name: None,
    }
}
