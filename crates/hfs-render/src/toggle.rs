//! Show/hide toggle for a single tessellated height-field mesh.
//!
//! The controller is a two-state machine. From `Absent`, `invoke` tessellates
//! and materializes a mesh; from `Present`, it releases that mesh. It never
//! holds more than one mesh's worth of display resources.

use std::sync::{Mutex, MutexGuard};
use std::time::Instant;

use hfs_core::error::{HfsError, Result};
use hfs_geometry::{HeightField, SamplingSpec};
use hfs_mesh::{tessellate_height_field, MeshBuffers, MeshOptions};
use log::{info, warn};

use crate::display::DisplayBackend;

/// Whether display resources currently exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleState<H> {
    Absent,
    Present(H),
}

/// Outcome of one [`ToggleController::invoke`].
#[derive(Debug, Clone, PartialEq)]
pub enum DisplayAction<H> {
    /// A mesh was materialized under `handle`.
    Show { handle: H, mesh: MeshBuffers },
    /// The resources behind `handle` were released.
    Hide { handle: H },
}

pub struct ToggleController<B: DisplayBackend, F> {
    backend: B,
    field: F,
    spec: SamplingSpec,
    options: MeshOptions,
    name: String,
    state: ToggleState<B::Handle>,
}

impl<B, F> ToggleController<B, F>
where
    B: DisplayBackend,
    F: HeightField,
{
    pub fn new(backend: B, field: F, spec: SamplingSpec, options: MeshOptions) -> Self {
        Self {
            backend,
            field,
            spec,
            options,
            name: "height-field".to_string(),
            state: ToggleState::Absent,
        }
    }

    /// Name under which meshes are materialized.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn state(&self) -> ToggleState<B::Handle> {
        self.state
    }

    pub fn is_present(&self) -> bool {
        matches!(self.state, ToggleState::Present(_))
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Toggle the mesh: show it when absent, hide it when present.
    ///
    /// A failed materialization leaves the controller `Absent`; a failed
    /// release leaves it `Present` with the same handle.
    pub fn invoke(&mut self) -> Result<DisplayAction<B::Handle>> {
        match self.state {
            ToggleState::Absent => self.show(),
            ToggleState::Present(handle) => self.hide(handle),
        }
    }

    /// Release any live resources; used when the host unloads.
    pub fn shutdown(&mut self) -> Result<()> {
        if let ToggleState::Present(handle) = self.state {
            self.hide(handle)?;
        }
        Ok(())
    }

    fn show(&mut self) -> Result<DisplayAction<B::Handle>> {
        let start = Instant::now();
        let mesh = tessellate_height_field(&self.spec, &self.field, &self.options)?;
        let tessellated = start.elapsed();

        let handle = self.backend.materialize(&self.name, &mesh).map_err(|err| {
            warn!("materializing '{}' failed: {}", self.name, err);
            err
        })?;
        self.state = ToggleState::Present(handle);
        self.backend.refresh();

        info!(
            "'{}': {} triangles, tessellation {:.3}s, display setup {:.3}s",
            self.name,
            mesh.triangle_count(),
            tessellated.as_secs_f64(),
            (start.elapsed() - tessellated).as_secs_f64()
        );
        Ok(DisplayAction::Show { handle, mesh })
    }

    fn hide(&mut self, handle: B::Handle) -> Result<DisplayAction<B::Handle>> {
        self.backend.release(handle).map_err(|err| {
            warn!("releasing '{}' ({:?}) failed: {}", self.name, handle, err);
            err
        })?;
        self.state = ToggleState::Absent;
        self.backend.refresh();
        info!("'{}': display resources released", self.name);
        Ok(DisplayAction::Hide { handle })
    }
}

/// A [`ToggleController`] behind a mutex, for hosts that may invoke it from
/// several threads.
pub struct SharedToggle<B: DisplayBackend, F> {
    inner: Mutex<ToggleController<B, F>>,
}

impl<B, F> SharedToggle<B, F>
where
    B: DisplayBackend,
    F: HeightField,
{
    pub fn new(controller: ToggleController<B, F>) -> Self {
        Self {
            inner: Mutex::new(controller),
        }
    }

    pub fn invoke(&self) -> Result<DisplayAction<B::Handle>> {
        self.lock()?.invoke()
    }

    pub fn state(&self) -> Result<ToggleState<B::Handle>> {
        Ok(self.lock()?.state())
    }

    pub fn shutdown(&self) -> Result<()> {
        self.lock()?.shutdown()
    }

    pub fn into_inner(self) -> Result<ToggleController<B, F>> {
        self.inner
            .into_inner()
            .map_err(|_| HfsError::InvalidOperation("toggle controller lock poisoned".into()))
    }

    fn lock(&self) -> Result<MutexGuard<'_, ToggleController<B, F>>> {
        self.inner
            .lock()
            .map_err(|_| HfsError::InvalidOperation("toggle controller lock poisoned".into()))
    }
}
