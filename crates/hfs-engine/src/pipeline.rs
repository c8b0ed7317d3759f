//! Host-facing drivers: build a surface body through a geometry kernel, and
//! set up the mesh show/hide toggle from configuration.

use std::time::Instant;

use hfs_core::error::Result;
use hfs_core::transaction::{run_in_transaction, TransactionManager};
use hfs_geometry::{materialize_body, GeometryKernel, HeightFunction};
use hfs_render::{DisplayBackend, ToggleController};
use log::info;

use crate::api::generate_patch_body_definition;
use crate::config::{MeshConfig, SurfaceConfig};

/// Build a bounded surface body for `config` using the host's kernel.
///
/// Sampling and validation run first, so malformed input never opens a
/// transaction. Kernel work runs inside a transaction named
/// `config.transaction_name`: committed on success, aborted on any failure.
/// An empty kernel result is a [`hfs_core::HfsError::Collaborator`] error.
pub fn build_surface_body<K, M>(
    config: &SurfaceConfig,
    kernel: &mut K,
    transactions: &mut M,
) -> Result<K::Body>
where
    K: GeometryKernel,
    M: TransactionManager,
{
    let t0 = Instant::now();
    let spec = config.sampling_spec()?;
    let definition = generate_patch_body_definition(&spec, &config.height)?;
    let prepared = t0.elapsed();

    let t1 = Instant::now();
    let body = run_in_transaction(transactions, &config.transaction_name, || {
        materialize_body(kernel, &definition)
    })?;
    let kernel_time = t1.elapsed();

    info!(
        "surface body {}x{}: preparation {:.3}s, kernel {:.3}s",
        spec.nu(),
        spec.nv(),
        prepared.as_secs_f64(),
        kernel_time.as_secs_f64()
    );
    Ok(body)
}

/// A show/hide toggle for the mesh described by `config`.
pub fn mesh_toggle<B: DisplayBackend>(
    config: &MeshConfig,
    backend: B,
) -> Result<ToggleController<B, HeightFunction>> {
    let spec = config.sampling_spec()?;
    let toggle = ToggleController::new(backend, config.height, spec, config.options());
    Ok(toggle.with_name(config.name.clone()))
}
