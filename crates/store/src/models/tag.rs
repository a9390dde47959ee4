use crate::error::{Error, ErrorKind};
use exn::ResultExt;
use quire_model::Tag;

#[derive(sqlx::FromRow)]
pub(crate) struct TagRow {
    pub(crate) id: i64,
    pub(crate) name: String,
    pub(crate) color: i64,
}

impl TryFrom<&Tag> for TagRow {
    type Error = Error;
    fn try_from(tag: &Tag) -> Result<Self, Self::Error> {
        Ok(Self {
            id: tag.id,
            name: tag.name.clone(),
            color: i64::from(tag.color),
        })
    }
}

impl TryFrom<TagRow> for Tag {
    type Error = Error;
    fn try_from(row: TagRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id,
            name: row.name,
            color: u32::try_from(row.color).or_raise(|| ErrorKind::InvalidData("color"))?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip() {
        let tag = Tag::new("favourites").with_color(0xFF00_AA00);
        let row = TagRow::try_from(&tag).unwrap();
        let back = Tag::try_from(row).unwrap();
        assert_eq!(back, tag);
    }
}
