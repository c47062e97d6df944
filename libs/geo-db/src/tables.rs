use sea_orm::sea_query::Alias;

/// Names of the hierarchy tables used to resolve join-through predicates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeoTables {
    pub departments: String,
    pub arrondissements: String,
    /// Primary key column of both tables.
    pub id_column: String,
    /// Department column pointing at its region.
    pub region_column: String,
    /// Arrondissement column pointing at its department.
    pub department_column: String,
}

impl Default for GeoTables {
    fn default() -> Self {
        Self {
            departments: "departements".to_owned(),
            arrondissements: "arrondissements".to_owned(),
            id_column: "id".to_owned(),
            region_column: "region_id".to_owned(),
            department_column: "department_id".to_owned(),
        }
    }
}

impl GeoTables {
    pub(crate) fn department_table(&self) -> Alias {
        Alias::new(self.departments.as_str())
    }

    pub(crate) fn arrondissement_table(&self) -> Alias {
        Alias::new(self.arrondissements.as_str())
    }

    pub(crate) fn department_col(&self, column: &str) -> (Alias, Alias) {
        (self.department_table(), Alias::new(column))
    }

    pub(crate) fn arrondissement_col(&self, column: &str) -> (Alias, Alias) {
        (self.arrondissement_table(), Alias::new(column))
    }
}
