use laybe_core::{
    Argument, ArgumentType, ConnectionType, DecodeError, Proposition, PropositionType,
    PropositionValidationError,
};
use std::collections::HashSet;

#[test]
fn enum_tokens_match_symbolic_names() {
    assert_eq!(PropositionType::Single.as_str(), "SINGLE");
    assert_eq!(PropositionType::Connection.as_str(), "CONNECTION");
    assert_eq!(ConnectionType::Conjunction.as_str(), "CONJUNCTION");
    assert_eq!(ConnectionType::Disjunction.as_str(), "DISJUNCTION");
    assert_eq!(ArgumentType::Implication.as_str(), "IMPLICATION");
    assert_eq!(ArgumentType::Abjunction.as_str(), "ABJUNCTION");

    assert_eq!("DISJUNCTION".parse::<ConnectionType>(), Ok(ConnectionType::Disjunction));
    assert_eq!(ArgumentType::Abjunction.to_string(), "ABJUNCTION");
}

#[test]
fn unknown_token_fails_with_decode_error() {
    let err = "single".parse::<PropositionType>().unwrap_err();
    assert_eq!(
        err,
        DecodeError {
            enum_name: "PropositionType",
            token: "single".to_string(),
        }
    );

    assert!("DEDUCTION".parse::<ArgumentType>().is_err());
    assert!(serde_json::from_str::<ConnectionType>("\"XOR\"").is_err());
}

#[test]
fn transient_equals_only_itself() {
    let first = Proposition::single("rain");
    let twin = Proposition::single("rain");

    assert_eq!(first, first);
    assert_ne!(first, twin);
    assert_ne!(first.clone(), first);
}

#[test]
fn persisted_entities_compare_by_id() {
    let mut left = Proposition::single("rain");
    let mut right = Proposition::single("wet");
    left.id = Some(7);
    right.id = Some(7);
    assert_eq!(left, right);

    right.id = Some(8);
    assert_ne!(left, right);

    let mut transient = Proposition::single("rain");
    assert_ne!(left, transient);
    transient.id = Some(7);
    assert_eq!(left, transient);

    let mut argument_a = Argument::new(ArgumentType::Implication, 1, 2);
    let mut argument_b = Argument::new(ArgumentType::Abjunction, 3, 4);
    argument_a.id = Some(1);
    argument_b.id = Some(1);
    assert_eq!(argument_a, argument_b);

    let ids: HashSet<Proposition> = [left, transient].into_iter().collect();
    assert_eq!(ids.len(), 1);
}

#[test]
fn validate_rejects_single_with_connection_fields() {
    let mut single = Proposition::single("rain");
    assert!(single.validate().is_ok());

    single.proposition2 = Some(3);
    assert_eq!(
        single.validate(),
        Err(PropositionValidationError::OperandsOnSingle)
    );

    single.proposition2 = None;
    single.connection_type = Some(ConnectionType::Conjunction);
    assert_eq!(
        single.validate(),
        Err(PropositionValidationError::ConnectionTypeOnSingle)
    );

    let connection = Proposition::connection(ConnectionType::Disjunction, 1, 2);
    assert!(connection.validate().is_ok());
    assert_eq!(connection.operands().collect::<Vec<_>>(), vec![1, 2]);
}

#[test]
fn proposition_serialization_uses_expected_wire_fields() {
    let mut proposition = Proposition::connection(ConnectionType::Conjunction, 3, 4);
    proposition.id = Some(9);

    let json = serde_json::to_value(&proposition).unwrap();
    assert_eq!(json["id"], 9);
    assert_eq!(json["type"], "CONNECTION");
    assert_eq!(json["connectionType"], "CONJUNCTION");
    assert_eq!(json["proposition1"], 3);
    assert_eq!(json["proposition2"], 4);
    assert!(json["text"].is_null());

    let decoded: Proposition = serde_json::from_value(json).unwrap();
    assert_eq!(decoded.id, Some(9));
    assert_eq!(decoded.kind, PropositionType::Connection);
    assert_eq!(decoded.connection_type, Some(ConnectionType::Conjunction));
}

#[test]
fn argument_deserializes_without_id() {
    let value = serde_json::json!({
        "type": "IMPLICATION",
        "premise": 1,
        "conclusion": 2
    });

    let argument: Argument = serde_json::from_value(value).unwrap();
    assert!(!argument.is_persisted());
    assert_eq!(argument.kind, ArgumentType::Implication);
    assert_eq!(argument.premise, Some(1));
    assert_eq!(argument.conclusion, Some(2));
}

#[test]
fn unknown_wire_token_is_rejected() {
    let value = serde_json::json!({
        "type": "INDUCTION",
        "premise": 1,
        "conclusion": 2
    });

    assert!(serde_json::from_value::<Argument>(value).is_err());
}
