use twocol_core::model::{CourseId, SectionId, UserId};

use crate::repository::StorageError;

pub(crate) fn ser<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Serialization(e.to_string())
}

pub(crate) fn conn<E: core::fmt::Display>(e: E) -> StorageError {
    StorageError::Connection(e.to_string())
}

fn i64_to_u64(field: &'static str, v: i64) -> Result<u64, StorageError> {
    u64::try_from(v).map_err(|_| StorageError::Serialization(format!("{field} sign overflow")))
}

fn u64_to_i64(field: &'static str, v: u64) -> Result<i64, StorageError> {
    i64::try_from(v).map_err(|_| StorageError::Serialization(format!("{field} overflow")))
}

pub(crate) fn course_id_to_i64(id: CourseId) -> Result<i64, StorageError> {
    u64_to_i64("course_id", id.value())
}

pub(crate) fn course_id_from_i64(v: i64) -> Result<CourseId, StorageError> {
    Ok(CourseId::new(i64_to_u64("course_id", v)?))
}

pub(crate) fn user_id_to_i64(id: UserId) -> Result<i64, StorageError> {
    u64_to_i64("user_id", id.value())
}

/// Course-level rows use section id `0`.
pub(crate) fn section_id_to_i64(id: Option<SectionId>) -> Result<i64, StorageError> {
    id.map_or(Ok(0), |s| u64_to_i64("section_id", s.value()))
}

pub(crate) fn section_id_from_i64(v: i64) -> Result<Option<SectionId>, StorageError> {
    match i64_to_u64("section_id", v)? {
        0 => Ok(None),
        id => Ok(Some(SectionId::new(id))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn course_level_rows_use_section_zero() {
        assert_eq!(section_id_to_i64(None).unwrap(), 0);
        assert_eq!(section_id_from_i64(0).unwrap(), None);
        assert_eq!(
            section_id_from_i64(14).unwrap(),
            Some(SectionId::new(14))
        );
    }

    #[test]
    fn negative_ids_are_rejected() {
        assert!(course_id_from_i64(-1).is_err());
    }
}
