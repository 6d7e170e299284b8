//! Reference catalogs edited from the back office.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::GatewayError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CatalogKind {
    TiposPago,
    TiposCaja,
    EstadosCaja,
    TiposMovimiento,
    TiposOperacion,
    TiposPropiedad,
    CaracteristicasPropiedad,
    EstadosPropiedad,
}

impl CatalogKind {
    pub const ALL: [CatalogKind; 8] = [
        CatalogKind::TiposPago,
        CatalogKind::TiposCaja,
        CatalogKind::EstadosCaja,
        CatalogKind::TiposMovimiento,
        CatalogKind::TiposOperacion,
        CatalogKind::TiposPropiedad,
        CatalogKind::CaracteristicasPropiedad,
        CatalogKind::EstadosPropiedad,
    ];

    /// Name used in gateway routes (`/api/catalogs/{slug}`).
    pub fn slug(self) -> &'static str {
        match self {
            CatalogKind::TiposPago => "tipos-pago",
            CatalogKind::TiposCaja => "tipos-caja",
            CatalogKind::EstadosCaja => "estados-caja",
            CatalogKind::TiposMovimiento => "tipos-movimiento",
            CatalogKind::TiposOperacion => "tipos-operacion",
            CatalogKind::TiposPropiedad => "tipos-propiedad",
            CatalogKind::CaracteristicasPropiedad => "caracteristicas-propiedad",
            CatalogKind::EstadosPropiedad => "estados-propiedad",
        }
    }

    /// Service key owning the catalog.
    pub fn service(self) -> &'static str {
        match self {
            CatalogKind::TiposPago
            | CatalogKind::TiposCaja
            | CatalogKind::EstadosCaja
            | CatalogKind::TiposMovimiento
            | CatalogKind::TiposOperacion => "caja",
            CatalogKind::TiposPropiedad
            | CatalogKind::CaracteristicasPropiedad
            | CatalogKind::EstadosPropiedad => "inmobiliaria",
        }
    }

    /// Resource path on the owning service.
    pub fn resource(self) -> &'static str {
        match self {
            CatalogKind::CaracteristicasPropiedad => "caracteristicas",
            other => other.slug(),
        }
    }
}

impl fmt::Display for CatalogKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for CatalogKind {
    type Err = GatewayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        CatalogKind::ALL
            .into_iter()
            .find(|kind| kind.slug() == s)
            .ok_or_else(|| GatewayError::UnknownCatalog(s.to_string()))
    }
}
