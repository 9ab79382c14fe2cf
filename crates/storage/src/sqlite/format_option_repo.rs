use std::collections::BTreeMap;

use async_trait::async_trait;
use sqlx::Row;
use twocol_core::model::{CourseId, SectionId};

use super::SqliteRepository;
use super::mapping::{
    conn, course_id_from_i64, course_id_to_i64, section_id_from_i64, section_id_to_i64, ser,
};
use crate::repository::{FORMAT_NAME, FormatOptionRecord, FormatOptionRepository, StorageError};

#[async_trait]
impl FormatOptionRepository for SqliteRepository {
    async fn load_options(&self, course: CourseId) -> Result<Vec<FormatOptionRecord>, StorageError> {
        let rows = sqlx::query(
            r"
            SELECT courseid, sectionid, name, value
            FROM course_format_options
            WHERE courseid = ?1 AND format = ?2
            ORDER BY sectionid, name
            ",
        )
        .bind(course_id_to_i64(course)?)
        .bind(FORMAT_NAME)
        .fetch_all(&self.pool)
        .await
        .map_err(conn)?;

        rows.iter()
            .map(|row| {
                Ok(FormatOptionRecord {
                    course_id: course_id_from_i64(row.try_get("courseid").map_err(ser)?)?,
                    section_id: section_id_from_i64(row.try_get("sectionid").map_err(ser)?)?,
                    name: row.try_get("name").map_err(ser)?,
                    value: row.try_get("value").map_err(ser)?,
                })
            })
            .collect()
    }

    async fn save_options(
        &self,
        course: CourseId,
        section: Option<SectionId>,
        values: &BTreeMap<String, String>,
    ) -> Result<(), StorageError> {
        let course_id = course_id_to_i64(course)?;
        let section_id = section_id_to_i64(section)?;
        let mut tx = self.pool.begin().await.map_err(conn)?;
        for (name, value) in values {
            sqlx::query(
                r"
                INSERT INTO course_format_options (courseid, format, sectionid, name, value)
                VALUES (?1, ?2, ?3, ?4, ?5)
                ON CONFLICT(courseid, format, sectionid, name) DO UPDATE SET
                    value = excluded.value
                ",
            )
            .bind(course_id)
            .bind(FORMAT_NAME)
            .bind(section_id)
            .bind(name)
            .bind(value)
            .execute(&mut *tx)
            .await
            .map_err(conn)?;
        }
        tx.commit().await.map_err(conn)?;
        Ok(())
    }

    async fn delete_section_options(
        &self,
        course: CourseId,
        section: SectionId,
    ) -> Result<(), StorageError> {
        sqlx::query(
            r"
            DELETE FROM course_format_options
            WHERE courseid = ?1 AND format = ?2 AND sectionid = ?3
            ",
        )
        .bind(course_id_to_i64(course)?)
        .bind(FORMAT_NAME)
        .bind(section_id_to_i64(Some(section))?)
        .execute(&self.pool)
        .await
        .map_err(conn)?;
        Ok(())
    }
}
