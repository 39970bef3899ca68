//! The bakery chart of accounts.
//!
//! Seeding is idempotent: accounts are matched by code and existing ones are
//! left untouched.

use std::collections::HashMap;

use obrador_core::accounts::AccountType;
use obrador_core::accounts::AccountType::{Asset, Equity, Expense, Income, Liability};
use sea_orm::DatabaseConnection;
use uuid::Uuid;

use crate::repositories::{AccountRepository, AccountStoreError, CreateAccountInput};

/// One account of the seed chart.
#[derive(Debug, Clone, Copy)]
pub struct SeedAccount {
    /// Dotted code; the parent's code is everything before the last dot.
    pub code: &'static str,
    /// Display name.
    pub name: &'static str,
    /// Account type.
    pub account_type: AccountType,
    /// Depth in the tree.
    pub level: i32,
}

impl SeedAccount {
    /// Only level-4 auxiliary accounts take postings.
    #[must_use]
    pub const fn allows_posting(&self) -> bool {
        self.level == 4
    }

    /// The parent's code, `None` for roots.
    #[must_use]
    pub fn parent_code(&self) -> Option<&'static str> {
        self.code.rsplit_once('.').map(|(parent, _)| parent)
    }
}

const fn account(
    code: &'static str,
    name: &'static str,
    account_type: AccountType,
    level: i32,
) -> SeedAccount {
    SeedAccount {
        code,
        name,
        account_type,
        level,
    }
}

/// The chart, parents before children.
pub const BAKERY_CHART: &[SeedAccount] = &[
    account("1", "ACTIVO", Asset, 1),
    account("1.1", "ACTIVO CORRIENTE", Asset, 2),
    account("1.1.01", "CAJA Y BANCOS", Asset, 3),
    account("1.1.01.001", "Caja General", Asset, 4),
    account("1.1.01.002", "Banco Mercantil Santa Cruz", Asset, 4),
    account("1.1.01.003", "Banco Nacional de Bolivia", Asset, 4),
    account("1.1.02", "CUENTAS POR COBRAR", Asset, 3),
    account("1.1.02.001", "Clientes", Asset, 4),
    account("1.1.03", "INVENTARIOS", Asset, 3),
    account("1.1.03.001", "Inventario de Materia Prima", Asset, 4),
    account("1.1.03.002", "Inventario de Productos Terminados", Asset, 4),
    account("1.1.03.003", "Inventario de Productos en Proceso", Asset, 4),
    account("1.2", "ACTIVO NO CORRIENTE", Asset, 2),
    account("1.2.01", "PROPIEDAD, PLANTA Y EQUIPO", Asset, 3),
    account("1.2.01.001", "Maquinaria y Equipo", Asset, 4),
    account("1.2.01.002", "Muebles y Enseres", Asset, 4),
    account("1.2.01.003", "Depreciación Acumulada", Asset, 4),
    account("2", "PASIVO", Liability, 1),
    account("2.1", "PASIVO CORRIENTE", Liability, 2),
    account("2.1.01", "CUENTAS POR PAGAR", Liability, 3),
    account("2.1.01.001", "Proveedores", Liability, 4),
    account("2.1.02", "IMPUESTOS POR PAGAR", Liability, 3),
    account("2.1.02.001", "IVA Débito Fiscal", Liability, 4),
    account("2.1.02.002", "IVA Crédito Fiscal", Liability, 4),
    account("2.1.03", "SUELDOS Y SALARIOS POR PAGAR", Liability, 3),
    account("2.1.03.001", "Sueldos por Pagar", Liability, 4),
    account("3", "PATRIMONIO", Equity, 1),
    account("3.1", "CAPITAL", Equity, 2),
    account("3.1.01", "CAPITAL SOCIAL", Equity, 3),
    account("3.1.01.001", "Capital Inicial", Equity, 4),
    account("3.2", "RESULTADOS", Equity, 2),
    account("3.2.01", "RESULTADOS ACUMULADOS", Equity, 3),
    account("3.2.01.001", "Utilidades Retenidas", Equity, 4),
    account("3.2.01.002", "Utilidad del Ejercicio", Equity, 4),
    account("4", "INGRESOS", Income, 1),
    account("4.1", "INGRESOS OPERACIONALES", Income, 2),
    account("4.1.01", "VENTAS", Income, 3),
    account("4.1.01.001", "Venta de Pan", Income, 4),
    account("4.1.01.002", "Venta de Pasteles", Income, 4),
    account("4.1.01.003", "Venta de Productos Especiales", Income, 4),
    account("4.1.02", "DESCUENTOS", Income, 3),
    account("4.1.02.001", "Descuentos sobre Ventas", Income, 4),
    account("5", "GASTOS", Expense, 1),
    account("5.1", "COSTO DE VENTAS", Expense, 2),
    account("5.1.01", "COSTO DE PRODUCCION", Expense, 3),
    account("5.1.01.001", "Costo de Materia Prima", Expense, 4),
    account("5.1.01.002", "Mano de Obra Directa", Expense, 4),
    account("5.1.01.003", "Costos Indirectos de Fabricación", Expense, 4),
    account("5.2", "GASTOS OPERACIONALES", Expense, 2),
    account("5.2.01", "GASTOS ADMINISTRATIVOS", Expense, 3),
    account("5.2.01.001", "Sueldos Administrativos", Expense, 4),
    account("5.2.01.002", "Alquiler de Local", Expense, 4),
    account("5.2.01.003", "Servicios Básicos", Expense, 4),
    account("5.2.01.004", "Depreciación", Expense, 4),
    account("5.2.02", "GASTOS DE VENTAS", Expense, 3),
    account("5.2.02.001", "Publicidad y Marketing", Expense, 4),
    account("5.2.02.002", "Comisiones de Vendedores", Expense, 4),
    account("5.2.02.003", "Transporte y Distribución", Expense, 4),
];

/// Outcome of a seeding run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedReport {
    /// Accounts inserted by this run.
    pub created: usize,
    /// Accounts that already existed.
    pub skipped: usize,
}

/// Loads `chart` into the database, skipping codes that already exist.
///
/// # Errors
///
/// Returns an error if a parent is missing from both the chart and the
/// database, or if the database fails.
pub async fn seed_chart(
    db: &DatabaseConnection,
    chart: &[SeedAccount],
) -> Result<SeedReport, AccountStoreError> {
    let repo = AccountRepository::new(db.clone());
    let mut ids: HashMap<&str, Uuid> = HashMap::new();
    let mut report = SeedReport::default();

    for seed in chart {
        if let Some(existing) = repo.find_by_code(seed.code).await? {
            ids.insert(seed.code, existing.id);
            report.skipped += 1;
            continue;
        }

        let parent_id = match seed.parent_code() {
            Some(code) => match ids.get(code) {
                Some(id) => Some(*id),
                None => repo.find_by_code(code).await?.map(|p| p.id),
            },
            None => None,
        };

        let created = repo
            .create_account(CreateAccountInput {
                code: seed.code.to_string(),
                name: seed.name.to_string(),
                account_type: seed.account_type,
                level: seed.level,
                parent_id: parent_id.map(Into::into),
                allows_posting: seed.allows_posting(),
                description: None,
            })
            .await?;
        ids.insert(seed.code, created.id);
        report.created += 1;
    }

    tracing::info!(created = report.created, skipped = report.skipped, "chart of accounts seeded");
    Ok(report)
}
