use std::collections::HashMap;
use std::sync::Mutex;

use super::RenderSurface;
use crate::charts::ChartSpec;
use crate::error::{DashboardError, Result};
use crate::logging::{log, obj, v_str, Domain, Level};

#[derive(Debug, Clone, PartialEq)]
pub enum Slot {
    Empty,
    Drawn(ChartSpec),
}

#[derive(Debug, Default)]
struct Table {
    slots: HashMap<String, Slot>,
    created: u64,
    retired: u64,
}

/// Surface table kept in memory; what a headless page would hold.
#[derive(Debug, Default)]
pub struct MemorySurface {
    table: Mutex<Table>,
}

impl MemorySurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn slot(&self, id: &str) -> Option<Slot> {
        self.table.lock().ok()?.slots.get(id).cloned()
    }

    pub fn chart(&self, id: &str) -> Option<ChartSpec> {
        match self.slot(id)? {
            Slot::Drawn(spec) => Some(spec),
            Slot::Empty => None,
        }
    }

    pub fn slot_count(&self) -> usize {
        self.table.lock().map(|t| t.slots.len()).unwrap_or(0)
    }

    pub fn drawn_count(&self) -> usize {
        self.table
            .lock()
            .map(|t| t.slots.values().filter(|s| matches!(s, Slot::Drawn(_))).count())
            .unwrap_or(0)
    }

    /// Charts drawn and charts retired since construction.
    pub fn counters(&self) -> (u64, u64) {
        self.table.lock().map(|t| (t.created, t.retired)).unwrap_or((0, 0))
    }
}

impl RenderSurface for MemorySurface {
    fn mount(&self, id: &str) -> Result<()> {
        let mut table = self.table.lock().map_err(|_| poisoned(id))?;
        if let Some(Slot::Drawn(_)) = table.slots.insert(id.to_string(), Slot::Empty) {
            table.retired += 1;
        }
        Ok(())
    }

    fn create(&self, id: &str, spec: ChartSpec) -> Result<()> {
        let mut table = self.table.lock().map_err(|_| poisoned(id))?;
        let slot = table
            .slots
            .get_mut(id)
            .ok_or_else(|| DashboardError::MissingTarget(id.to_string()))?;
        let retired = matches!(slot, Slot::Drawn(_));
        *slot = Slot::Drawn(spec);
        table.created += 1;
        if retired {
            table.retired += 1;
            log(Level::Debug, Domain::Surface, "retired", obj(&[("chart", v_str(id))]));
        }
        Ok(())
    }

    fn destroy(&self, id: &str) -> Result<()> {
        let mut table = self.table.lock().map_err(|_| poisoned(id))?;
        if let Some(Slot::Drawn(_)) = table.slots.remove(id) {
            table.retired += 1;
        }
        Ok(())
    }
}

fn poisoned(id: &str) -> DashboardError {
    DashboardError::SurfaceIo {
        id: id.to_string(),
        source: std::io::Error::new(std::io::ErrorKind::Other, "surface table lock poisoned"),
    }
}
