//! Extension-defined status channels over a host's fixed status table.
//!
//! Extensions register named channels while the [`Registry`] is open. On first need the
//! registry finalizes: registered names are sorted case-insensitively and appended after
//! the host's native channels, so every peer that registered the same set of names agrees
//! on every index. The [`CompositionSignature`] fingerprints that layout.
//!
//! # Modules
//!
//! - [`registry`] - Open/Finalized lifecycle, registration outcomes
//! - [`resolver`] - immutable name/index snapshot published by finalization
//! - [`expand`] - in-place growth of host value arrays
//! - [`detector`] - exactly-once activation detection around host mutations
//! - [`bus`] - ordered activation dispatch with per-handler failure isolation
//! - [`named`] - name-keyed wrappers over the index API
//! - [`system`] - host-facing facade
//!
//! # Host integration
//!
//! Hosts implement [`StatusOps`] and [`StatusHolder`] for their status objects, call
//! [`StatusSystem::prepare_holder`] once the extensions have registered, and route
//! mutations through a [`TransitionDetector`]. [`MemoryHolder`] is a complete in-memory
//! reference host.

pub mod bus;
pub mod cap;
pub mod channel;
pub mod detector;
pub mod error;
pub mod event;
pub mod expand;
pub mod host;
pub mod index;
pub mod name;
pub mod named;
pub mod registry;
pub mod resolver;
pub mod system;

pub use bus::{DispatchReport, EventBus, FailureReason, HandlerFailure, HandlerStage, SubscriptionId};
pub use cap::CapOverride;
pub use channel::{ActivationHandler, ChannelDef, HandlerError, HandlerResult, IconHandle, Registration};
pub use detector::{ActivationLatch, Observed, Tracked, TransitionDetector};
pub use error::{HostError, RegistryError, Result};
pub use event::ActivationEvent;
pub use expand::{Expansion, expand, expand_holder};
pub use host::{DEFAULT_NATIVE_CAP, HolderId, MemoryHolder, StatusArrays, StatusHolder, StatusOps};
pub use index::{NativeTable, VirtualIndex};
pub use named::{IndexLookup, NamedStatusExt};
pub use registry::Registry;
pub use resolver::{CompositionSignature, IndexResolver};
pub use system::StatusSystem;
