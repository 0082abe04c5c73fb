// Interview lifecycle: created → in progress (answers accumulate) → completed (report attached).
// State is inferred from which fields are populated; there is no status column.

pub mod handlers;
pub mod lifecycle;
