use core_types::Frequency;
use sqlx::{Postgres, QueryBuilder};

/// Crime category and place restrictions for the grouped aggregation.
///
/// An absent or empty list means "no restriction". Values are matched
/// verbatim.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrimeFilter {
    crimes: Option<Vec<String>>,
    places: Option<Vec<String>>,
}

fn non_empty(list: Option<Vec<String>>) -> Option<Vec<String>> {
    list.filter(|l| !l.is_empty())
}

impl CrimeFilter {
    pub fn new(crimes: Option<Vec<String>>, places: Option<Vec<String>>) -> Self {
        Self {
            crimes: non_empty(crimes),
            places: non_empty(places),
        }
    }

    pub fn crimes(&self) -> Option<&[String]> {
        self.crimes.as_deref()
    }

    pub fn places(&self) -> Option<&[String]> {
        self.places.as_deref()
    }

    /// Replaces the place restriction.
    pub fn with_places(mut self, places: Vec<String>) -> Self {
        self.places = Some(places);
        self
    }

    /// Whether a record with this category and area passes the filter.
    pub fn matches(&self, crimecodedesc: &str, areaname: &str) -> bool {
        let crime_ok = self
            .crimes
            .as_ref()
            .is_none_or(|c| c.iter().any(|x| x == crimecodedesc));
        let place_ok = self
            .places
            .as_ref()
            .is_none_or(|p| p.iter().any(|x| x == areaname));
        crime_ok && place_ok
    }

    /// Appends the `WHERE` clause, binding each list as a text array.
    pub fn push_where(&self, qb: &mut QueryBuilder<'_, Postgres>) {
        let mut separator = " WHERE ";
        if let Some(crimes) = &self.crimes {
            qb.push(separator)
                .push("crimecodedesc = ANY(")
                .push_bind(crimes.clone())
                .push(")");
            separator = " AND ";
        }
        if let Some(places) = &self.places {
            qb.push(separator)
                .push("areaname = ANY(")
                .push_bind(places.clone())
                .push(")");
        }
    }
}

/// Builds the per-bucket aggregation over `crimes`.
pub fn grouped_query(filter: &CrimeFilter, frequency: Frequency) -> QueryBuilder<'static, Postgres> {
    let mut qb = QueryBuilder::new(format!(
        "SELECT date_trunc('{}', date)::date AS period, \
         COUNT(*)::BIGINT AS count, \
         COALESCE(SUM(pond), 0)::DOUBLE PRECISION AS pond \
         FROM crimes",
        frequency.sql_unit()
    ));
    filter.push_where(&mut qb);
    qb.push(" GROUP BY 1 ORDER BY 1");
    qb
}
