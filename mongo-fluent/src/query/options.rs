use std::time::Duration;

use mongodb::options::{
    Acknowledgment, Collation, Hint, ReadConcern, ReadPreference, SelectionCriteria, WriteConcern,
};

use super::Query;

/// The per-call options handed to the driver.
///
/// Unless changed, reads use the `local` read concern against the primary and writes wait for a
/// majority acknowledgement for up to a second without journaling, applied in order.
#[derive(Clone, Debug)]
pub struct Options {
    pub(crate) read_concern: ReadConcern,
    pub(crate) selection_criteria: SelectionCriteria,
    pub(crate) write_concern: WriteConcern,
    pub(crate) ordered: bool,
    pub(crate) batch_size: Option<u32>,
    pub(crate) max_time: Option<Duration>,
    pub(crate) hint: Option<Hint>,
    pub(crate) collation: Option<Collation>,
    pub(crate) bypass_document_validation: Option<bool>,
}

impl Default for Options {
    fn default() -> Self {
        let mut write_concern = WriteConcern::default();
        write_concern.w = Some(Acknowledgment::Majority);
        write_concern.w_timeout = Some(Duration::from_millis(1000));
        write_concern.journal = Some(false);
        Self {
            read_concern: ReadConcern::local(),
            selection_criteria: SelectionCriteria::ReadPreference(ReadPreference::Primary),
            write_concern,
            ordered: true,
            batch_size: None,
            max_time: None,
            hint: None,
            collation: None,
            bypass_document_validation: None,
        }
    }
}

impl Options {
    /// The read concern used by queries and counts.
    pub fn read_concern(&self) -> &ReadConcern {
        &self.read_concern
    }

    /// The server selection used by queries and commands.
    pub fn selection_criteria(&self) -> &SelectionCriteria {
        &self.selection_criteria
    }

    /// The write concern used by inserts, updates and deletes.
    pub fn write_concern(&self) -> &WriteConcern {
        &self.write_concern
    }

    /// Whether bulk writes stop at the first failure.
    pub fn ordered(&self) -> bool {
        self.ordered
    }

    /// Whether writes skip schema validation.
    pub fn bypass_document_validation(&self) -> Option<bool> {
        self.bypass_document_validation
    }
}

impl Query {
    /// The read concern for this query.
    ///
    /// The level of isolation the server should apply when reading the documents.
    pub fn read_concern(&mut self, value: ReadConcern) -> &mut Self {
        self.options.read_concern = value;
        self
    }

    /// The read preference for this query.
    ///
    /// Describes which servers are suitable for a read operation.
    pub fn read_preference(&mut self, value: ReadPreference) -> &mut Self {
        self.options.selection_criteria = SelectionCriteria::ReadPreference(value);
        self
    }

    /// The write concern for inserts, updates and deletes.
    pub fn write_concern(&mut self, value: WriteConcern) -> &mut Self {
        self.options.write_concern = value;
        self
    }

    /// Whether bulk writes are applied in order, stopping at the first failure.
    pub fn ordered(&mut self, enable: bool) -> &mut Self {
        self.options.ordered = enable;
        self
    }

    /// The number of documents the server should return per cursor batch.
    ///
    /// # Notes
    ///
    /// This does not have any affect on the documents that are returned, only the number of
    /// round trips needed to return them.
    pub fn batch_size(&mut self, size: u32) -> &mut Self {
        self.options.batch_size = Some(size);
        self
    }

    /// The maximum amount of time to allow the query to run.
    pub fn max_time(&mut self, value: Duration) -> &mut Self {
        self.options.max_time = Some(value);
        self
    }

    /// A document or string that specifies the index to use to support the query predicate.
    pub fn hint(&mut self, value: Hint) -> &mut Self {
        self.options.hint = Some(value);
        self
    }

    /// The collation to use for the operation.
    ///
    /// Collation allows users to specify language-specific rules for string comparison, such as
    /// rules for lettercase and accent marks.
    pub fn collation(&mut self, value: Collation) -> &mut Self {
        self.options.collation = Some(value);
        self
    }

    /// Opt out of document-level validation.
    pub fn bypass_document_validation(&mut self, enable: bool) -> &mut Self {
        self.options.bypass_document_validation = Some(enable);
        self
    }

    /// Insert a document if no documents match the update filter.
    pub fn upsert(&mut self, enable: bool) -> &mut Self {
        self.upsert = enable;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use mongodb::options::ReadConcernLevel;

    #[test]
    fn defaults() {
        let options = Options::default();
        assert_eq!(options.read_concern().level, ReadConcernLevel::Local);
        assert!(matches!(
            options.selection_criteria(),
            SelectionCriteria::ReadPreference(ReadPreference::Primary)
        ));
        assert_eq!(
            options.write_concern().w,
            Some(Acknowledgment::Majority)
        );
        assert_eq!(
            options.write_concern().w_timeout,
            Some(Duration::from_millis(1000))
        );
        assert_eq!(options.write_concern().journal, Some(false));
        assert!(options.ordered());
    }

    #[test]
    fn setters_apply() {
        let mut query = Query::new();
        query
            .batch_size(50)
            .max_time(Duration::from_secs(2))
            .read_concern(ReadConcern::majority())
            .ordered(false)
            .upsert(true);
        let options = query.find_options();
        assert_eq!(options.batch_size, Some(50));
        assert_eq!(options.max_time, Some(Duration::from_secs(2)));
        assert_eq!(
            options.read_concern.map(|c| c.level),
            Some(ReadConcernLevel::Majority)
        );
        assert!(!query.options().ordered());
        assert!(query.is_upsert());
    }
}
