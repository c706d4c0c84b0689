use nimbus_domain::{catalog_fingerprint, listing, DomainError, InputType, WorkflowKind, CATALOG};

#[test]
fn test_workflow_ids_round_trip() {
    for kind in WorkflowKind::all() {
        assert_eq!(WorkflowKind::parse(kind.id()).unwrap(), *kind);
    }
}

#[test]
fn test_unknown_workflow_is_rejected() {
    // Fallar cerrado: ningún id fuera del conjunto se acepta
    let err = WorkflowKind::parse("crypto-miner").unwrap_err();
    assert_eq!(err, DomainError::UnknownWorkflow("crypto-miner".to_string()));
    assert!("".parse::<WorkflowKind>().is_err());
}

#[test]
fn test_input_types() {
    assert_eq!(WorkflowKind::MeetingAssistant.input_type(), InputType::Audio);
    assert_eq!(WorkflowKind::InspirationGenerator.input_type(), InputType::Image);
    assert_eq!(WorkflowKind::RagChatbot.input_type(), InputType::Text);
}

#[test]
fn test_every_workflow_is_listed() {
    for kind in WorkflowKind::all() {
        let entry = listing(*kind).expect("workflow without catalog entry");
        assert!(!entry.title.is_empty());
        assert!(entry.price > 0.0);
    }
    assert_eq!(CATALOG.len(), WorkflowKind::all().len());
}

#[test]
fn test_catalog_fingerprint_is_stable() {
    let a = catalog_fingerprint();
    let b = catalog_fingerprint();
    assert_eq!(a, b);
    assert_eq!(a.len(), 64); // sha256 hex
}
