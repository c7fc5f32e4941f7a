//! The fixed TPC-C table catalog.
//!
//! Tables are listed in load order: `0_config` must run first to bind
//! the session variables the templates read, and later tables
//! reference rows inserted by earlier ones.

use crate::error::{Error, Result};
use crate::planner;

/// How a table's row volume relates to the warehouse count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GrowthLaw {
    /// Constant file/insert/row counts, independent of scale.
    Fixed {
        files: u64,
        inserts: u64,
        rows: RowCount,
    },
    /// Partitioned across files by the planner.
    Scaled {
        warehouses_per_file: u64,
        inserts_per_warehouse: u64,
        rows_per_insert: u64,
    },
    /// One insert per `warehouses_per_insert` warehouses in a single
    /// file, with a partial final batch when the division is uneven.
    Stepped {
        warehouses_per_insert: u64,
        rows_per_warehouse: u64,
    },
}

/// Row count of a fixed table's insert statements.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowCount {
    Literal(u64),
    /// One row per warehouse (the `warehouse` table itself).
    Warehouses,
}

/// Session variables bound before a table's rows are generated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Initializer {
    None,
    /// `@warehouses` and `@nurand_c`.
    WarehousesAndNurandC,
    /// `@nurand_c` only.
    NurandC,
}

impl Initializer {
    /// Render the statement handed to the backend before generation,
    /// or `None` when the table binds nothing.
    pub fn render(&self, warehouses: u64, nurand_c: u32) -> Option<String> {
        match self {
            Initializer::None => None,
            Initializer::WarehousesAndNurandC => Some(format!(
                "@warehouses := {warehouses}; @nurand_c := {nurand_c}"
            )),
            Initializer::NurandC => Some(format!("@nurand_c := {nurand_c}")),
        }
    }
}

/// One table template and its scaling behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableSpec {
    pub template: &'static str,
    pub growth: GrowthLaw,
    pub initializer: Initializer,
}

/// Resolved generation parameters for one table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableParams {
    pub files: u64,
    pub inserts: u64,
    pub rows: u64,
    /// Insert count of the final file, when it differs from the rest.
    pub last_inserts: Option<u64>,
    /// Row count of the final insert, when it is a partial batch.
    pub last_rows: Option<u64>,
}

impl TableParams {
    /// Total rows the backend will emit for these parameters.
    pub fn total_rows(&self) -> u64 {
        let last_inserts = self.last_inserts.unwrap_or(self.inserts);
        let last_file = match self.last_rows {
            Some(last) => (last_inserts - 1) * self.rows + last,
            None => last_inserts * self.rows,
        };
        self.inserts * self.rows * (self.files - 1) + last_file
    }
}

impl TableSpec {
    /// Resolve file/insert/row counts for the given warehouse count.
    pub fn resolve(&self, warehouses: u64) -> Result<TableParams> {
        if warehouses == 0 {
            return Err(Error::InvalidParameter(
                "warehouse count must be at least 1".into(),
            ));
        }
        match self.growth {
            GrowthLaw::Fixed {
                files,
                inserts,
                rows,
            } => Ok(TableParams {
                files,
                inserts,
                rows: match rows {
                    RowCount::Literal(n) => n,
                    RowCount::Warehouses => warehouses,
                },
                last_inserts: None,
                last_rows: None,
            }),
            GrowthLaw::Scaled {
                warehouses_per_file,
                inserts_per_warehouse,
                rows_per_insert,
            } => {
                let plan = planner::plan(warehouses, warehouses_per_file, inserts_per_warehouse)?;
                Ok(TableParams {
                    files: plan.files,
                    inserts: plan.inserts_per_file,
                    rows: rows_per_insert,
                    last_inserts: plan.last_file_inserts,
                    last_rows: None,
                })
            }
            GrowthLaw::Stepped {
                warehouses_per_insert,
                rows_per_warehouse,
            } => {
                let tail = warehouses % warehouses_per_insert;
                Ok(TableParams {
                    files: 1,
                    inserts: warehouses.div_ceil(warehouses_per_insert),
                    rows: warehouses_per_insert * rows_per_warehouse,
                    last_inserts: None,
                    last_rows: (tail != 0).then_some(tail * rows_per_warehouse),
                })
            }
        }
    }
}

/// Load-ordered table catalog.
///
/// A full dump is roughly `80.3 * W + 8.3` MiB. Per-file warehouse
/// capacities of the scaled tables keep each output file around a
/// quarter gigabyte.
pub const CATALOG: [TableSpec; 9] = [
    // 4 rows of run metadata; binds the session variables.
    TableSpec {
        template: "0_config",
        growth: GrowthLaw::Fixed {
            files: 1,
            inserts: 1,
            rows: RowCount::Literal(4),
        },
        initializer: Initializer::WarehousesAndNurandC,
    },
    // 100_000 rows, ~8.3 MiB.
    TableSpec {
        template: "1_item",
        growth: GrowthLaw::Fixed {
            files: 1,
            inserts: 1000,
            rows: RowCount::Literal(100),
        },
        initializer: Initializer::None,
    },
    // W rows, 113 B per warehouse.
    TableSpec {
        template: "2_warehouse",
        growth: GrowthLaw::Fixed {
            files: 1,
            inserts: 1,
            rows: RowCount::Warehouses,
        },
        initializer: Initializer::None,
    },
    // 100_000 rows/warehouse, ~33 MiB/warehouse.
    TableSpec {
        template: "3_stock",
        growth: GrowthLaw::Scaled {
            warehouses_per_file: 8,
            inserts_per_warehouse: 1000,
            rows_per_insert: 100,
        },
        initializer: Initializer::None,
    },
    // 10 rows/warehouse, ~1.2 KiB/warehouse; a single file suffices
    // below W = 20_000.
    TableSpec {
        template: "4_district",
        growth: GrowthLaw::Stepped {
            warehouses_per_insert: 10,
            rows_per_warehouse: 10,
        },
        initializer: Initializer::None,
    },
    // 30_000 rows/warehouse, ~18 MiB/warehouse.
    TableSpec {
        template: "5_customer",
        growth: GrowthLaw::Scaled {
            warehouses_per_file: 14,
            inserts_per_warehouse: 300,
            rows_per_insert: 100,
        },
        initializer: Initializer::NurandC,
    },
    // 30_000 rows/warehouse, ~2.4 MiB/warehouse.
    TableSpec {
        template: "6_history",
        growth: GrowthLaw::Scaled {
            warehouses_per_file: 100,
            inserts_per_warehouse: 300,
            rows_per_insert: 100,
        },
        initializer: Initializer::None,
    },
    // 30_000 orders plus ~300_000 order lines per warehouse,
    // ~27 MiB/warehouse.
    TableSpec {
        template: "7_order",
        growth: GrowthLaw::Scaled {
            warehouses_per_file: 10,
            inserts_per_warehouse: 3000,
            rows_per_insert: 10,
        },
        initializer: Initializer::None,
    },
    // 9_000 rows/warehouse, ~127 KiB/warehouse.
    TableSpec {
        template: "8_new_order",
        growth: GrowthLaw::Scaled {
            warehouses_per_file: 2048,
            inserts_per_warehouse: 90,
            rows_per_insert: 100,
        },
        initializer: Initializer::None,
    },
];
