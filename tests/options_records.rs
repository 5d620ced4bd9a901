use fe_kernel::prelude::*;

#[test]
fn gcellset_options_from_json() {
    let opts: GCellSetOptions =
        serde_json::from_str(r#"{ "conn": [[0, 1], [1, 2]], "axis_symm": true }"#).unwrap();
    assert_eq!(opts.other_dimension, None);
    let set = GCellSet::from_options(ElementType::L2, &opts).unwrap();
    assert_eq!(set.count(), 2);
    assert!(set.axis_symm());
    assert_eq!(set.other_dimension().as_constant(), Some(1.0));

    let text = serde_json::to_string(&opts).unwrap();
    let back: GCellSetOptions = serde_json::from_str(&text).unwrap();
    assert_eq!(back, opts);
}

#[test]
fn unknown_option_keys_are_rejected() {
    let err = serde_json::from_str::<GCellSetOptions>(r#"{ "conn": [], "thickness": 2.0 }"#);
    assert!(err.is_err());
    let err = serde_json::from_str::<FieldOptions>(r#"{ "nfens": 2, "dim": 1, "bcs": [] }"#);
    assert!(err.is_err());
}

#[test]
fn field_options_apply_conditions() {
    let json = r#"{
        "nfens": 3,
        "dim": 2,
        "values": [[1.0, 1.0], [2.0, 2.0], [3.0, 3.0]],
        "ebcs": [
            { "nodes": [0], "value": 0.0 },
            { "nodes": [2], "component": 1, "value": -4.0 }
        ]
    }"#;
    let opts: FieldOptions = serde_json::from_str(json).unwrap();
    let mut field = Field::from_options(&opts).unwrap();
    assert!(!field.is_numbered());
    assert_eq!(field.prescribed_count(), 3);
    assert_eq!(field.at(2).unwrap(), &[3.0, 3.0]);
    field.apply_prescribed_values();
    assert_eq!(field.at(0).unwrap(), &[0.0, 0.0]);
    assert_eq!(field.at(2).unwrap(), &[3.0, -4.0]);
    assert_eq!(field.number_equations(), 3);
    assert_eq!(field.eqnum(2, 0).unwrap(), Some(2));

    let bad = FieldOptions {
        ebcs: vec![EssentialBc::new([7], 0, 1.0)],
        ..opts
    };
    assert!(matches!(
        Field::from_options(&bad),
        Err(MeshError::IndexOutOfRange { what: "node", index: 7, len: 3 })
    ));
}

#[test]
fn nodes_round_trip_and_box_select() {
    let nodes = Nodes::try_new(2, &[vec![0.0, 0.0], vec![1.0, 0.0], vec![1.0, 1.0]]).unwrap();
    let text = serde_json::to_string(&nodes).unwrap();
    let back: Nodes = serde_json::from_str(&text).unwrap();
    assert_eq!(back, nodes);
    assert_eq!(back.box_select(&[0.5, 1.5, -0.1, 0.1], 0.0).unwrap(), vec![1]);
    assert_eq!(back.box_select(&[1.0, 1.0, 0.0, 0.0], 1e-9).unwrap(), vec![1]);
}

#[test]
fn malformed_node_records_are_rejected() {
    assert!(serde_json::from_str::<Nodes>(r#"{"dim":0,"xyz":[]}"#).is_err());
    assert!(serde_json::from_str::<Nodes>(r#"{"dim":2,"xyz":[1.0,2.0,3.0]}"#).is_err());
    let nodes: Nodes = serde_json::from_str(r#"{"dim":2,"xyz":[1.0,2.0,3.0,4.0]}"#).unwrap();
    assert_eq!(nodes.count(), 2);
    assert_eq!(nodes.xyz_at(1).unwrap(), &[3.0, 4.0]);
    assert!(matches!(
        Nodes::from_flat(0, Vec::new()),
        Err(MeshError::InvalidInput(_))
    ));
}
