//! Lifecycle of the processing chain sitting between the transport's source
//! and the output: built once on the first play, resumed before each play,
//! and fed live gain updates afterwards.

use std::sync::Arc;

use thiserror::Error;

use crate::dsp::FilterChain;
use crate::eq::{BAND_COUNT, EqSettings};
use crate::player::{MediaLocator, TrackId};
use crate::transport::{Transport, TransportError};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum GraphStatus {
    /// No play has been requested yet.
    #[default]
    Uninitialized,
    /// The filter chain is attached to the transport.
    Ready,
    /// Construction failed; the transport outputs directly without EQ.
    Degraded,
}

#[derive(Debug, Error)]
pub enum GraphError {
    #[error("processing context unavailable: {0}")]
    Context(#[from] TransportError),
}

/// Gains the live filters should carry for `settings` when the EQ is
/// `enabled`. A disabled EQ leaves every band at 0 dB without touching the
/// stored settings.
pub fn target_gains(settings: &EqSettings, enabled: bool) -> [f32; BAND_COUNT] {
    let gains = settings.gains();
    std::array::from_fn(|i| if enabled { gains[i] as f32 } else { 0.0 })
}

#[derive(Debug, Default)]
pub struct SignalGraph {
    status: GraphStatus,
    chain: Option<Arc<FilterChain>>,
}

impl SignalGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn status(&self) -> GraphStatus {
        self.status
    }

    pub fn is_ready(&self) -> bool {
        self.status == GraphStatus::Ready
    }

    /// Build the chain and attach it to `transport`. Runs at most once; later
    /// calls return the settled status. Failure degrades to direct output.
    pub fn ensure_initialized<T: Transport + ?Sized>(
        &mut self,
        transport: &mut T,
        settings: &EqSettings,
        enabled: bool,
        volume: f32,
    ) -> GraphStatus {
        if self.status != GraphStatus::Uninitialized {
            return self.status;
        }

        match Self::build(transport, settings, enabled, volume) {
            Ok(chain) => {
                log::info!("signal graph ready ({BAND_COUNT} bands)");
                self.chain = Some(chain);
                self.status = GraphStatus::Ready;
            }
            Err(e) => {
                log::warn!("signal graph unavailable, playing without equalizer: {e}");
                transport.set_volume(volume);
                self.status = GraphStatus::Degraded;
            }
        }
        self.status
    }

    fn build<T: Transport + ?Sized>(
        transport: &mut T,
        settings: &EqSettings,
        enabled: bool,
        volume: f32,
    ) -> Result<Arc<FilterChain>, GraphError> {
        transport.create_context()?;
        let chain = Arc::new(FilterChain::new(target_gains(settings, enabled), volume));
        transport.attach_chain(chain.clone());
        // Master gain now lives on the chain.
        transport.set_volume(1.0);
        Ok(chain)
    }

    pub fn resume_if_suspended<T: Transport + ?Sized>(&self, transport: &mut T) {
        if self.status != GraphStatus::Ready || !transport.context_suspended() {
            return;
        }
        if let Err(e) = transport.resume_context() {
            log::warn!("failed to resume processing context: {e}");
        }
    }

    pub fn set_master_gain<T: Transport + ?Sized>(&self, transport: &mut T, volume: f32) {
        let volume = volume.clamp(0.0, 1.0);
        match &self.chain {
            Some(chain) => chain.set_master_gain(volume),
            None => transport.set_volume(volume),
        }
    }

    /// Push `settings` (or zeros when disabled) into the live filters. A
    /// no-op before the chain exists; it picks the values up when built.
    pub fn update_band_gains(&self, settings: &EqSettings, enabled: bool) {
        let Some(chain) = &self.chain else {
            return;
        };
        for (i, gain) in target_gains(settings, enabled).into_iter().enumerate() {
            chain.set_band_gain(i, gain);
        }
    }

    pub fn load_source<T: Transport + ?Sized>(
        &self,
        transport: &mut T,
        id: &TrackId,
        locator: &MediaLocator,
    ) {
        log::debug!("loading {id} from {locator}");
        transport.load(id, locator);
    }

    /// Gains currently applied by the filters, `None` before construction or
    /// when degraded.
    pub fn live_gains(&self) -> Option<[f32; BAND_COUNT]> {
        self.chain.as_ref().map(|c| c.band_gains())
    }

    pub fn master_gain(&self) -> Option<f32> {
        self.chain.as_ref().map(|c| c.master_gain())
    }
}
