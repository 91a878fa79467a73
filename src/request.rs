//! Request document construction
//!
//! Translates bound parameters into the descriptor tree for one raw PC:
//!
//! | Parameter          | Effect                                          |
//! |--------------------|-------------------------------------------------|
//! | `osImage`          | disk image of the node, verbatim                |
//! | `requestDataStore` | attaches a best-effort 2000GB blockstore at /data |
//! | `runSetup`         | attaches `sudo -E bash /local/repository/setup.sh` |
//!
//! Cluster authority and hardware type are fixed for this profile. This
//! module does no I/O.

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

use crate::params::BoundParameters;

/// Client id of the single node
pub const NODE_CLIENT_ID: &str = "gpu0";
/// Clemson cluster aggregate
pub const COMPONENT_MANAGER_ID: &str = "urn:publicid:IDN+clemson.cloudlab.us+authority+cm";
/// Dell r7525: 2x AMD 7542, 512GB RAM, 2x V100S 32GB
pub const HARDWARE_TYPE: &str = "r7525";
pub const RAW_PC_SLIVER: &str = "raw-pc";

pub const BLOCKSTORE_NAME: &str = "bs_data";
pub const DATA_MOUNT_POINT: &str = "/data";
pub const DATA_STORE_SIZE: &str = "2000GB";

pub const SETUP_SHELL: &str = "bash";
pub const SETUP_COMMAND: &str = "sudo -E bash /local/repository/setup.sh";

/// A node-local block store
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageRequest {
    pub name: String,
    pub mount_point: String,
    /// Human readable capacity, e.g. "2000GB"
    pub size: String,
    /// Allocation may yield less or nothing without failing the request
    pub best_effort: bool,
    pub readonly: bool,
}

impl StorageRequest {
    /// The /data store this profile requests
    pub fn data_store() -> Self {
        Self {
            name: BLOCKSTORE_NAME.to_string(),
            mount_point: DATA_MOUNT_POINT.to_string(),
            size: DATA_STORE_SIZE.to_string(),
            best_effort: true,
            readonly: false,
        }
    }
}

/// A command run once the node is up
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BootAction {
    pub shell: String,
    pub command: String,
}

impl BootAction {
    pub fn execute(shell: &str, command: &str) -> Self {
        Self {
            shell: shell.to_string(),
            command: command.to_string(),
        }
    }

    /// Runs the repository setup script with root privilege
    pub fn setup_script() -> Self {
        Self::execute(SETUP_SHELL, SETUP_COMMAND)
    }
}

/// One compute resource to allocate
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeRequest {
    pub client_id: String,
    pub component_manager_id: String,
    pub hardware_type: String,
    pub sliver_type: String,
    pub exclusive: bool,
    pub disk_image: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub blockstore: Option<StorageRequest>,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub services: Vec<BootAction>,
}

impl NodeRequest {
    /// An exclusive bare-metal node with no image or children yet
    pub fn raw_pc(client_id: &str) -> Self {
        Self {
            client_id: client_id.to_string(),
            component_manager_id: String::new(),
            hardware_type: String::new(),
            sliver_type: RAW_PC_SLIVER.to_string(),
            exclusive: true,
            disk_image: String::new(),
            blockstore: None,
            services: Vec::new(),
        }
    }

    pub fn attach_blockstore(&mut self, store: StorageRequest) {
        self.blockstore = Some(store);
    }

    pub fn add_service(&mut self, action: BootAction) {
        self.services.push(action);
    }
}

impl fmt::Display for NodeRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Node({}, hw={}, image={}",
            self.client_id, self.hardware_type, self.disk_image
        )?;
        if let Some(bs) = &self.blockstore {
            write!(f, ", blockstore={}@{}", bs.size, bs.mount_point)?;
        }
        for svc in &self.services {
            write!(f, ", execute={:?}", svc.command)?;
        }
        write!(f, ")")
    }
}

/// Root of the request
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RequestDocument {
    pub nodes: Vec<NodeRequest>,
}

impl RequestDocument {
    /// Returns a summary of the request for logging
    pub fn summary(&self) -> String {
        let mut lines = vec![format!("Request ({} node(s)):", self.nodes.len())];
        for node in &self.nodes {
            lines.push(format!("  {}", node));
        }
        lines.join("\n")
    }
}

/// Build the request for the bound parameters.
///
/// Always yields exactly one node. The two toggles are independent.
pub fn build_request(params: &BoundParameters) -> RequestDocument {
    let mut node = NodeRequest::raw_pc(NODE_CLIENT_ID);
    node.component_manager_id = COMPONENT_MANAGER_ID.to_string();
    node.hardware_type = HARDWARE_TYPE.to_string();
    node.disk_image = params.os_image.clone();

    if params.request_data_store {
        debug!("Attaching best-effort data store at {}", DATA_MOUNT_POINT);
        node.attach_blockstore(StorageRequest::data_store());
    }

    if params.run_setup {
        debug!("Attaching setup execute service");
        node.add_service(BootAction::setup_script());
    }

    RequestDocument { nodes: vec![node] }
}
