use crate::domain::{Project, SortColumn};
use std::cmp::Ordering;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub const fn toggled(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }

    pub const fn arrow(self) -> &'static str {
        match self {
            Self::Asc => "▲",
            Self::Desc => "▼",
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SortState {
    pub column: Option<SortColumn>,
    pub direction: SortDirection,
}

impl SortState {
    /// Same column flips the direction, a new column starts ascending.
    pub fn advance(&mut self, column: SortColumn) {
        if self.column == Some(column) {
            self.direction = self.direction.toggled();
        } else {
            self.column = Some(column);
            self.direction = SortDirection::Asc;
        }
    }

    /// Direction indicator for a header cell, if that column is active.
    pub fn indicator(&self, column: SortColumn) -> Option<SortDirection> {
        (self.column == Some(column)).then_some(self.direction)
    }
}

/// Order in which the table presents the collection.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DerivedOrder {
    /// No sort requested since the last fetch; the server order applies.
    #[default]
    Unsorted,
    /// Indices into the unsorted sequence. May legitimately be empty.
    Sorted(Vec<usize>),
}

/// Projects from the last applied fetch, in server order, plus the order
/// derived from the active sort.
#[derive(Debug, Clone, Default)]
pub struct ProjectCollection {
    projects: Vec<Project>,
    derived: DerivedOrder,
    sort: SortState,
}

impl ProjectCollection {
    pub fn new(projects: Vec<Project>) -> Self {
        Self {
            projects,
            ..Self::default()
        }
    }

    /// Installs a freshly fetched collection and forgets any sort.
    pub fn replace(&mut self, projects: Vec<Project>) {
        self.projects = projects;
        self.derived = DerivedOrder::Unsorted;
        self.sort = SortState::default();
    }

    /// Advances the sort state for `column` and rebuilds the derived order
    /// from the unsorted sequence.
    pub fn sort_by(&mut self, column: SortColumn) {
        self.sort.advance(column);
        let direction = self.sort.direction;

        let mut order: Vec<usize> = (0..self.projects.len()).collect();
        // `sort_by` is stable, ties keep server order in both directions.
        order.sort_by(|&a, &b| {
            compare_projects(&self.projects[a], &self.projects[b], column, direction)
        });

        tracing::debug!(
            column = column.key(),
            %direction,
            rows = order.len(),
            "sorted project collection"
        );
        self.derived = DerivedOrder::Sorted(order);
    }

    pub const fn sort_state(&self) -> SortState {
        self.sort
    }

    pub const fn derived_order(&self) -> &DerivedOrder {
        &self.derived
    }

    /// Server order, never reordered in place.
    pub fn unsorted(&self) -> &[Project] {
        &self.projects
    }

    pub fn len(&self) -> usize {
        self.projects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.projects.is_empty()
    }

    /// Projects in the order the table shows them.
    pub fn effective(&self) -> Vec<&Project> {
        match &self.derived {
            DerivedOrder::Unsorted => self.projects.iter().collect(),
            DerivedOrder::Sorted(order) => order.iter().map(|&index| &self.projects[index]).collect(),
        }
    }

    /// The project shown at table row `row`.
    pub fn effective_get(&self, row: usize) -> Option<&Project> {
        match &self.derived {
            DerivedOrder::Unsorted => self.projects.get(row),
            DerivedOrder::Sorted(order) => order.get(row).and_then(|&index| self.projects.get(index)),
        }
    }
}

/// Comparator used by the table sort.
///
/// Missing values become `""` for text columns and `0` for numeric ones, so a
/// missing metric ties with a real zero.
pub fn compare_projects(
    a: &Project,
    b: &Project,
    column: SortColumn,
    direction: SortDirection,
) -> Ordering {
    let ordering = if column.is_numeric() {
        let left = column.numeric_value(a).unwrap_or(0.0);
        let right = column.numeric_value(b).unwrap_or(0.0);
        left.partial_cmp(&right).unwrap_or(Ordering::Equal)
    } else {
        let left = column.text_value(a).unwrap_or("").to_lowercase();
        let right = column.text_value(b).unwrap_or("").to_lowercase();
        left.cmp(&right)
    };

    match direction {
        SortDirection::Asc => ordering,
        SortDirection::Desc => ordering.reverse(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn project(code: &str, name: &str, score: Option<f64>) -> Project {
        Project {
            codigo: Some(code.to_string()),
            nombre: Some(name.to_string()),
            score_exito: score,
            ..Project::default()
        }
    }

    fn codes(collection: &ProjectCollection) -> Vec<&str> {
        collection
            .effective()
            .into_iter()
            .map(Project::display_code)
            .collect()
    }

    #[test]
    fn missing_numeric_value_sorts_as_zero() {
        let mut collection = ProjectCollection::new(vec![
            project("A", "Alfa", Some(5.0)),
            project("B", "Beta", None),
        ]);

        collection.sort_by(SortColumn::ScoreExito);

        assert_eq!(codes(&collection), ["B", "A"]);
    }

    #[test]
    fn numeric_sort_is_monotonic_in_both_directions() {
        let mut collection = ProjectCollection::new(vec![
            project("A", "a", Some(0.7)),
            project("B", "b", Some(-1.0)),
            project("C", "c", Some(3.5)),
            project("D", "d", Some(0.7)),
        ]);

        collection.sort_by(SortColumn::ScoreExito);
        let ascending: Vec<f64> = collection
            .effective()
            .iter()
            .map(|p| p.score_exito.unwrap_or_default())
            .collect();
        assert!(ascending.windows(2).all(|pair| pair[0] <= pair[1]));

        collection.sort_by(SortColumn::ScoreExito);
        let descending: Vec<f64> = collection
            .effective()
            .iter()
            .map(|p| p.score_exito.unwrap_or_default())
            .collect();
        assert!(descending.windows(2).all(|pair| pair[0] >= pair[1]));
    }

    #[test]
    fn text_sort_ignores_case() {
        let mut collection = ProjectCollection::new(vec![
            project("1", "torre", None),
            project("2", "Alameda", None),
            project("3", "bosque", None),
        ]);

        collection.sort_by(SortColumn::Nombre);

        assert_eq!(codes(&collection), ["2", "3", "1"]);
    }

    #[test]
    fn ties_keep_server_order_in_both_directions() {
        let mut collection = ProjectCollection::new(vec![
            project("A", "x", Some(1.0)),
            project("B", "x", Some(2.0)),
            project("C", "x", Some(1.0)),
            project("D", "x", Some(2.0)),
        ]);

        collection.sort_by(SortColumn::ScoreExito);
        assert_eq!(codes(&collection), ["A", "C", "B", "D"]);

        collection.sort_by(SortColumn::ScoreExito);
        assert_eq!(codes(&collection), ["B", "D", "A", "C"]);
    }

    #[test]
    fn toggling_twice_restores_the_first_ascending_order() {
        let mut collection = ProjectCollection::new(vec![
            project("C", "Cedro", None),
            project("A", "Abeto", None),
            project("B", "abeto", None),
        ]);

        collection.sort_by(SortColumn::Nombre);
        let first = codes(&collection).join(",");
        collection.sort_by(SortColumn::Nombre);
        collection.sort_by(SortColumn::Nombre);

        assert_eq!(codes(&collection).join(","), first);
        assert_eq!(collection.sort_state().direction, SortDirection::Asc);
    }

    #[test]
    fn switching_columns_resets_direction_to_ascending() {
        let mut collection = ProjectCollection::new(vec![project("A", "a", None)]);

        collection.sort_by(SortColumn::Nombre);
        collection.sort_by(SortColumn::Nombre);
        assert_eq!(collection.sort_state().direction, SortDirection::Desc);

        collection.sort_by(SortColumn::Zona);
        assert_eq!(
            collection.sort_state(),
            SortState {
                column: Some(SortColumn::Zona),
                direction: SortDirection::Asc,
            }
        );
    }

    #[test]
    fn replace_resets_sort_and_derived_order() {
        let mut collection = ProjectCollection::new(vec![
            project("B", "b", None),
            project("A", "a", None),
        ]);
        collection.sort_by(SortColumn::Codigo);
        collection.sort_by(SortColumn::Codigo);

        collection.replace(vec![project("Z", "z", None), project("Y", "y", None)]);

        assert_eq!(collection.sort_state(), SortState::default());
        assert_eq!(collection.derived_order(), &DerivedOrder::Unsorted);
        assert_eq!(codes(&collection), ["Z", "Y"]);
    }

    #[test]
    fn sorting_an_empty_collection_is_distinct_from_unsorted() {
        let mut collection = ProjectCollection::default();
        collection.sort_by(SortColumn::Barrio);

        assert_eq!(collection.derived_order(), &DerivedOrder::Sorted(Vec::new()));
        assert!(collection.effective().is_empty());
    }

    #[test]
    fn unsorted_sequence_is_never_reordered() {
        let mut collection = ProjectCollection::new(vec![
            project("B", "b", None),
            project("A", "a", None),
        ]);

        collection.sort_by(SortColumn::Codigo);

        let server_order: Vec<_> = collection.unsorted().iter().map(Project::display_code).collect();
        assert_eq!(server_order, ["B", "A"]);
        assert_eq!(collection.effective_get(0).map(Project::display_code), Some("A"));
    }
}
