use machinedesk_core::{
    MachineService, MachineStatus, MachineStore, MachineValidationError, ServiceError,
};
use tempfile::TempDir;

fn service() -> (TempDir, MachineService) {
    let dir = tempfile::tempdir().unwrap();
    let store = MachineStore::open(dir.path().join("data.db")).unwrap();
    (dir, MachineService::new(store))
}

fn count_rows(service: &MachineService) -> i64 {
    let conn = service.store().open_connection().unwrap();
    conn.query_row("SELECT COUNT(*) FROM machines;", [], |row| row.get(0))
        .unwrap()
}

#[test]
fn crud_walkthrough_matches_form_workflow() {
    let (_dir, service) = service();

    let first = service
        .create_machine("Press-01", "LineA", "operational")
        .unwrap();
    assert_eq!(first, 1);
    let listed = service.list_machines().unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, 1);
    assert_eq!(listed[0].name, "Press-01");
    assert_eq!(listed[0].line, "LineA");
    assert_eq!(listed[0].status, MachineStatus::Operational);

    let second = service
        .create_machine(" Lathe-02 ", "LineB", "maintenance")
        .unwrap();
    assert_eq!(second, 2);
    let listed = service.list_machines().unwrap();
    assert_eq!(
        listed.iter().map(|machine| machine.id).collect::<Vec<_>>(),
        vec![2, 1]
    );
    assert_eq!(listed[0].name, "Lathe-02");
    assert_eq!(listed[0].line, "LineB");

    service
        .update_machine(1, "Press-01", "LineA", "offline")
        .unwrap();
    assert_eq!(
        service.get_machine(1).unwrap().unwrap().status,
        MachineStatus::Offline
    );

    let err = service
        .update_machine(99, "X", "Y", "operational")
        .unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(99)));

    let err = service
        .create_machine("", "LineA", "operational")
        .unwrap_err();
    assert!(matches!(
        err,
        ServiceError::Validation(MachineValidationError::MissingName)
    ));
    assert!(err.to_string().contains("name is required"));

    service.delete_machine(2).unwrap();
    assert!(service.get_machine(2).unwrap().is_none());
    let listed = service.list_machines().unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].id, 1);
}

#[test]
fn create_returns_fresh_ids_and_allows_duplicates() {
    let (_dir, service) = service();

    let mut ids = Vec::new();
    for _ in 0..3 {
        ids.push(
            service
                .create_machine("Press-01", "LineA", "operational")
                .unwrap(),
        );
    }

    assert_eq!(ids, vec![1, 2, 3]);
    assert_eq!(count_rows(&service), 3);
}

#[test]
fn invalid_status_is_rejected_without_writing() {
    let (_dir, service) = service();
    let id = service
        .create_machine("Press-01", "LineA", "operational")
        .unwrap();

    for status in ["", "running", "Operational", " offline", "OFFLINE"] {
        let err = service
            .create_machine("Press-02", "LineA", status)
            .unwrap_err();
        assert!(
            matches!(
                err,
                ServiceError::Validation(MachineValidationError::InvalidStatus(_))
            ),
            "status `{status}` gave {err}"
        );
        assert_eq!(
            err.to_string(),
            "Status must be one of: maintenance, offline, operational"
        );

        let err = service
            .update_machine(id, "Renamed", "LineZ", status)
            .unwrap_err();
        assert!(matches!(err, ServiceError::Validation(_)));
    }

    assert_eq!(count_rows(&service), 1);
    let unchanged = service.get_machine(id).unwrap().unwrap();
    assert_eq!(unchanged.name, "Press-01");
    assert_eq!(unchanged.status, MachineStatus::Operational);
}

#[test]
fn blank_name_or_line_is_rejected() {
    let (_dir, service) = service();
    let id = service
        .create_machine("Press-01", "LineA", "operational")
        .unwrap();

    for blank in ["", " ", "\t\n"] {
        let err = service
            .create_machine(blank, "LineA", "operational")
            .unwrap_err();
        assert_eq!(err.to_string(), "Machine name is required.");

        let err = service
            .create_machine("Press-02", blank, "operational")
            .unwrap_err();
        assert_eq!(err.to_string(), "Production line is required.");

        assert!(matches!(
            service.update_machine(id, blank, "LineA", "offline"),
            Err(ServiceError::Validation(MachineValidationError::MissingName))
        ));
        assert!(matches!(
            service.update_machine(id, "Press-01", blank, "offline"),
            Err(ServiceError::Validation(MachineValidationError::MissingLine))
        ));
    }

    assert_eq!(count_rows(&service), 1);
}

#[test]
fn update_trims_and_keeps_id_and_created_at() {
    let (_dir, service) = service();
    let id = service
        .create_machine("Press-01", "LineA", "operational")
        .unwrap();
    let before = service.get_machine(id).unwrap().unwrap();

    service
        .update_machine(id, "  Press-01b  ", " LineC ", "maintenance")
        .unwrap();

    let after = service.get_machine(id).unwrap().unwrap();
    assert_eq!(after.id, before.id);
    assert_eq!(after.created_at, before.created_at);
    assert_eq!(after.name, "Press-01b");
    assert_eq!(after.line, "LineC");
    assert_eq!(after.status, MachineStatus::Maintenance);
}

#[test]
fn delete_missing_returns_not_found_and_keeps_rows() {
    let (_dir, service) = service();
    service
        .create_machine("Press-01", "LineA", "operational")
        .unwrap();

    let err = service.delete_machine(5).unwrap_err();
    assert!(matches!(err, ServiceError::NotFound(5)));
    assert_eq!(err.to_string(), "Machine not found.");
    assert_eq!(count_rows(&service), 1);

    service.delete_machine(1).unwrap();
    assert!(matches!(
        service.delete_machine(1),
        Err(ServiceError::NotFound(1))
    ));
}

#[test]
fn list_on_empty_store_is_empty() {
    let (_dir, service) = service();

    assert!(service.list_machines().unwrap().is_empty());
    assert!(service.get_machine(1).unwrap().is_none());
}

#[test]
fn records_survive_store_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("data.db");

    let service = MachineService::new(MachineStore::open(&path).unwrap());
    let id = service
        .create_machine("Press-01", "LineA", "offline")
        .unwrap();
    service.close();

    let service = MachineService::new(MachineStore::open(&path).unwrap());
    let loaded = service.get_machine(id).unwrap().unwrap();
    assert_eq!(loaded.name, "Press-01");
    assert_eq!(loaded.status, MachineStatus::Offline);
}

#[test]
fn store_rejected_write_surfaces_as_store_error() {
    let (_dir, service) = service();
    {
        let conn = service.store().open_connection().unwrap();
        conn.execute_batch(
            "CREATE TRIGGER machines_read_only BEFORE INSERT ON machines
             BEGIN SELECT RAISE(ABORT, 'store is read-only'); END;",
        )
        .unwrap();
    }

    let err = service
        .create_machine("Press-01", "LineA", "operational")
        .unwrap_err();
    assert!(matches!(err, ServiceError::Store(_)));
    assert!(err.to_string().contains("store is read-only"), "{err}");
    assert_eq!(count_rows(&service), 0);
}
