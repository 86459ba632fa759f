//! Record loading and result persistence on real files

#[cfg(test)]
mod tests {
    use crate::common::RecordFactory;
    use crate::common::fixtures::{CLEAN_DATA_JSON, write_file};
    use customer_uploader::{
        LocationType, Record, ResultPersister, StorageError, UploadStatus, load_records,
    };

    #[test]
    fn test_loads_cleaning_pipeline_output() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(dir.path(), "clean_data.json", CLEAN_DATA_JSON);

        let records = load_records(&path).unwrap();
        assert_eq!(records.len(), 2);

        let ana = &records[0];
        assert_eq!(ana.password, "45896321");
        assert_eq!(ana.upload_status, UploadStatus::Unset);
        assert!(!ana.is_created());
        assert_eq!(ana.addresses[0].loc_type, LocationType::Home);
        assert!(ana.custom_fields().is_empty());

        let luis = &records[1];
        assert!(luis.is_created());
        assert_eq!(luis.customer_id, Some(998877));
        assert_eq!(luis.upload_status, UploadStatus::Success);
        assert_eq!(luis.custom_fields()[0].label, "segment");
        assert!(luis.error_message.is_none());
    }

    #[test]
    fn test_saved_results_load_back_identically() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("results.json");

        let mut failed = RecordFactory::with_addresses("Bruno", &["B street 1"]);
        failed.upload_status = UploadStatus::Failed;
        failed.error_message = Some("User creation failed: HTTP error 422".to_string());
        let records = vec![RecordFactory::created("Ana", 41), failed];

        ResultPersister::new(&path).save(&records).unwrap();
        let loaded = load_records(&path).unwrap();
        assert_eq!(loaded, records);
    }

    #[test]
    fn test_results_keep_unset_status_as_null() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("results.json");

        ResultPersister::new(&path)
            .save(&[Record::new("1", "Ana", "Quispe")])
            .unwrap();

        let raw: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert!(raw[0]["upload_status"].is_null());
        assert!(raw[0]["customer_id"].is_null());
    }

    #[test]
    fn test_malformed_file_is_invalid_format() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_file(dir.path(), "broken.json", "[{\"password\": ");

        let err = load_records(&path).unwrap_err();
        assert!(matches!(err, StorageError::InvalidFormat { .. }));
    }

    #[test]
    fn test_missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_records(dir.path().join("nope.json")).unwrap_err();
        assert!(matches!(err, StorageError::NotFound(_)));
    }
}
