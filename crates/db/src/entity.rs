use crate::row::StorageRow;

/// A domain record stored one-to-one in a named remote table.
///
/// `from_row` and `to_row` form the field mapper for the entity: both are
/// pure and total over the known column set. `from_row(&x.to_row()) == x`
/// holds for every record.
pub trait Entity: Clone + PartialEq + Send + Sync + 'static {
    /// Name of the remote table backing this entity.
    const TABLE: &'static str;

    /// Columns the store manages itself; never written back.
    const READ_ONLY: &'static [&'static str] = &[];

    fn id(&self) -> &str;

    fn from_row(row: &StorageRow) -> Self;

    fn to_row(&self) -> StorageRow;

    /// Storage form used for inserts. An empty identifier is left out so the
    /// store can assign one.
    fn to_insert_row(&self) -> StorageRow {
        let row = self.to_row().without(Self::READ_ONLY);
        if self.id().is_empty() {
            row.without(&["id"])
        } else {
            row
        }
    }

    /// Columns that changed between `previous` and `self`, minus read-only ones.
    fn changes_since(&self, previous: &Self) -> StorageRow {
        self.to_row()
            .changes_from(&previous.to_row())
            .without(Self::READ_ONLY)
            .without(&["id"])
    }
}
