use std::sync::Arc;

use tracing::{debug, info};

use crate::error::StoreResult;
use crate::model::{
    decode_flag, encode_flag, Action, BuildStatus, Color, LightsState, Mode, CI_STATUS_KEY,
};
use crate::store::KvStore;

/// Reads and writes light state. The only path to the store.
///
/// Writes are independent key sets: a reader may observe a partially
/// applied multi-color update.
#[derive(Clone)]
pub struct LightRepository {
    store: Arc<dyn KvStore>,
}

impl LightRepository {
    pub fn new(store: Arc<dyn KvStore>) -> Self {
        Self { store }
    }

    /// Current canonical lights as seen under `mode`.
    pub async fn read_all(&self, mode: Mode) -> StoreResult<LightsState> {
        match mode {
            Mode::Public => self.read_public().await,
            Mode::Ci => self.read_ci().await,
        }
    }

    async fn read_public(&self) -> StoreResult<LightsState> {
        let keys: Vec<String> = Color::CANONICAL.iter().map(Color::key).collect();
        let values = self.store.multi_get(&keys).await?;

        let mut state = LightsState::dark(Mode::Public);
        for (color, value) in Color::CANONICAL.iter().zip(values.iter()) {
            state.set(*color, decode_flag(value.as_deref()));
        }
        Ok(state)
    }

    async fn read_ci(&self) -> StoreResult<LightsState> {
        let raw = self.store.get(CI_STATUS_KEY).await?;

        let mut state = LightsState::dark(Mode::Ci);
        if let Some(color) = raw.as_deref().map(BuildStatus::parse).and_then(|s| s.active_color()) {
            state.set(color, true);
        }
        Ok(state)
    }

    /// Store a raw value for one light, regardless of mode.
    pub async fn write(&self, color: Color, value: &str) -> StoreResult<()> {
        self.store.set(&color.key(), value).await?;
        if decode_flag(Some(value)) {
            info!(color = %color, "light switched on");
        }
        Ok(())
    }

    pub async fn set_flag(&self, color: Color, on: bool) -> StoreResult<()> {
        self.write(color, encode_flag(on)).await
    }

    /// Switch off red, yellow and green. Orange is left as is.
    pub async fn reset_canonical(&self) -> StoreResult<()> {
        for color in Color::CANONICAL {
            self.set_flag(color, false).await?;
        }
        Ok(())
    }

    /// Persist classifier output in order; later actions on the same color win.
    pub async fn apply(&self, actions: &[Action]) -> StoreResult<()> {
        for action in actions {
            self.set_flag(action.color, action.on).await?;
        }
        Ok(())
    }

    pub async fn set_ci_status(&self, raw: &str) -> StoreResult<()> {
        debug!(status = raw, "storing ci build status");
        self.store.set(CI_STATUS_KEY, raw).await
    }
}
