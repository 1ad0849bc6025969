use chrono::Utc;

use crate::{
    database::{Database, StoreError, next_id, required},
    model::supplementary_material::{NewMaterial, SupplementaryMaterial},
};

impl Database {
    pub fn add_material(&mut self, new: NewMaterial) -> Result<SupplementaryMaterial, StoreError> {
        let course_id = required(new.course_id, "course_id")?;
        let title = required(new.title.filter(|t| !t.trim().is_empty()), "title")?;
        let kind = required(new.kind, "kind")?;
        let url = required(new.url.filter(|u| !u.trim().is_empty()), "url")?;

        if self.course(course_id).is_none() {
            return Err(StoreError::UnknownCourse(course_id));
        }

        let material = SupplementaryMaterial {
            id: next_id(self.materials.iter().map(|m| m.id)),
            course_id,
            title,
            kind,
            url,
            upload_date: new.upload_date.unwrap_or_else(|| Utc::now().date_naive()),
            size: new.size,
        };

        tracing::info!("Added material {} to course {course_id}", material.id);
        self.materials.push(material.clone());
        Ok(material)
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::model::supplementary_material::MaterialKind;

    fn slides(course_id: u32) -> NewMaterial {
        NewMaterial {
            course_id: Some(course_id),
            title: Some("Week 3 slides".into()),
            kind: Some(MaterialKind::Document),
            url: Some("https://example.com/week3".into()),
            ..Default::default()
        }
    }

    #[test]
    fn material_gets_next_id_and_todays_date() {
        let mut db = Database::seeded();
        let material = db.add_material(slides(5)).unwrap();

        assert_eq!(material.id, 4);
        assert_eq!(material.upload_date, Utc::now().date_naive());
        assert_eq!(db.materials_for_course(5), vec![material]);
    }

    #[test]
    fn first_material_gets_id_one() {
        let mut db = Database::seeded();
        db.materials.clear();

        let material = db.add_material(slides(1)).unwrap();
        assert_eq!(material.id, 1);
        assert_eq!(db.materials().len(), 1);
    }

    #[test]
    fn material_requires_kind_and_known_course() {
        let mut db = Database::seeded();
        let err = db
            .add_material(NewMaterial {
                kind: None,
                ..slides(1)
            })
            .unwrap_err();
        assert_eq!(err, StoreError::MissingField("kind"));
        assert_eq!(db.add_material(slides(9)).unwrap_err(), StoreError::UnknownCourse(9));
        assert_eq!(db.materials().len(), 3);
    }
}
