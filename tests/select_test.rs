use sqlt::{
    executor::statement::{
        ColumnDef, Condition, CreateTableStatement, InsertStatement, Literal, Projection,
        SelectStatement, Statement,
    },
    types::{error::DatabaseError, value::DataType, value::Value},
    utils::mock::TempDatabase,
    StatementResult,
};

fn setup(temp_db: &mut TempDatabase) -> &mut sqlt::Database {
    let db = temp_db.open_database().unwrap();

    db.execute(Statement::CreateTable(CreateTableStatement {
        table: "people".to_string(),
        columns: vec![
            ColumnDef::new("id", DataType::Integer).primary_key(),
            ColumnDef::new("Name", DataType::Text),
            ColumnDef::new("age", DataType::Integer),
        ],
    }))
    .unwrap();

    let people: [(i64, Option<&str>, Option<i64>); 4] = [
        (1, Some("Alice"), Some(30)),
        (2, Some("Bob"), Some(25)),
        (3, Some("Clara"), None),
        (4, None, Some(40)),
    ];
    for (id, name, age) in people {
        let mut columns = vec!["id".to_string()];
        let mut values = vec![Literal::Integer(id)];
        if let Some(name) = name {
            columns.push("name".to_string());
            values.push(Literal::Text(name.to_string()));
        }
        if let Some(age) = age {
            columns.push("age".to_string());
            values.push(Literal::Integer(age));
        }
        db.execute(Statement::Insert(InsertStatement {
            table: "people".to_string(),
            columns,
            values,
        }))
        .unwrap();
    }

    db
}

fn select(projection: Projection, conditions: Vec<Condition>) -> Statement {
    Statement::Select(SelectStatement {
        table: "people".to_string(),
        projection,
        conditions,
    })
}

fn unpack(result: StatementResult) -> (Vec<String>, Vec<Vec<Value>>, String) {
    match result {
        StatementResult::Selected {
            columns,
            rows,
            message,
        } => (columns, rows.into_iter().map(|r| r.values).collect(), message),
        other => panic!("Expected Selected, got {:?}", other),
    }
}

#[test]
fn test_select_star() {
    let mut temp_db = TempDatabase::with_prefix("select_star");
    let db = setup(&mut temp_db);

    let (columns, rows, message) = unpack(db.execute(select(Projection::All, vec![])).unwrap());
    // declared names in declared order, original casing preserved
    assert_eq!(columns, vec!["id", "Name", "age"]);
    assert_eq!(rows.len(), 4);
    assert_eq!(message, "4 row(s)");

    let ids: Vec<Value> = rows.iter().map(|r| r[0].clone()).collect();
    assert_eq!(
        ids,
        vec![
            Value::Integer(1),
            Value::Integer(2),
            Value::Integer(3),
            Value::Integer(4),
        ]
    );
}

#[test]
fn test_select_empty_table() {
    let mut temp_db = TempDatabase::with_prefix("select_empty");
    let db = temp_db.open_database().unwrap();
    db.execute(Statement::CreateTable(CreateTableStatement {
        table: "nothing".to_string(),
        columns: vec![ColumnDef::new("x", DataType::Integer)],
    }))
    .unwrap();

    let (columns, rows, message) = unpack(
        db.execute(Statement::Select(SelectStatement {
            table: "nothing".to_string(),
            projection: Projection::All,
            conditions: vec![],
        }))
        .unwrap(),
    );
    assert_eq!(columns, vec!["x"]);
    assert!(rows.is_empty());
    assert_eq!(message, "0 row(s)");
}

#[test]
fn test_select_missing_table() {
    let mut temp_db = TempDatabase::with_prefix("select_missing");
    let db = temp_db.open_database().unwrap();
    assert!(matches!(
        db.execute(Statement::Select(SelectStatement {
            table: "ghosts".to_string(),
            projection: Projection::All,
            conditions: vec![],
        })),
        Err(DatabaseError::TableNotFound { .. })
    ));
}

#[test]
fn test_projection_order_and_case() {
    let mut temp_db = TempDatabase::with_prefix("select_projection");
    let db = setup(&mut temp_db);

    let projection = Projection::Columns(vec!["AGE".to_string(), "id".to_string()]);
    let (columns, rows, _) = unpack(db.execute(select(projection, vec![])).unwrap());

    // user's order, schema's casing
    assert_eq!(columns, vec!["age", "id"]);
    assert_eq!(rows[0], vec![Value::Integer(30), Value::Integer(1)]);
}

#[test]
fn test_unknown_projection_column_rejected() {
    let mut temp_db = TempDatabase::with_prefix("select_bad_projection");
    let db = setup(&mut temp_db);

    let projection = Projection::Columns(vec!["salary".to_string()]);
    match db.execute(select(projection, vec![])) {
        Err(DatabaseError::ColumnNotFound { name, table }) => {
            assert_eq!(name, "salary");
            assert_eq!(table, "people");
        }
        other => panic!("Expected ColumnNotFound, got {:?}", other),
    }
}

#[test]
fn test_unknown_where_column_rejected() {
    let mut temp_db = TempDatabase::with_prefix("select_bad_where");
    let db = setup(&mut temp_db);

    let conditions = vec![Condition::eq("salary", Literal::Integer(1))];
    assert!(matches!(
        db.execute(select(Projection::All, conditions)),
        Err(DatabaseError::ColumnNotFound { .. })
    ));
}

#[test]
fn test_where_equal() {
    let mut temp_db = TempDatabase::with_prefix("select_eq");
    let db = setup(&mut temp_db);

    let conditions = vec![Condition::eq("name", Literal::Text("Bob".to_string()))];
    let (_, rows, _) = unpack(db.execute(select(Projection::All, conditions)).unwrap());
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0][0], Value::Integer(2));
}

#[test]
fn test_where_comparisons_on_integers() {
    let mut temp_db = TempDatabase::with_prefix("select_int_ops");
    let db = setup(&mut temp_db);

    let cases: [(Condition, Vec<i32>); 5] = [
        (Condition::lt("age", Literal::Integer(30)), vec![2]),
        (Condition::le("age", Literal::Integer(30)), vec![1, 2]),
        (Condition::gt("age", Literal::Integer(25)), vec![1, 4]),
        (Condition::ge("age", Literal::Integer(30)), vec![1, 4]),
        (Condition::ne("age", Literal::Integer(30)), vec![2, 4]),
    ];
    for (condition, expected) in cases {
        let (_, rows, _) = unpack(
            db.execute(select(Projection::All, vec![condition.clone()]))
                .unwrap(),
        );
        let ids: Vec<i32> = rows
            .iter()
            .map(|r| match r[0] {
                Value::Integer(i) => i,
                _ => panic!("id must be an integer"),
            })
            .collect();
        assert_eq!(ids, expected, "condition {:?}", condition);
    }
}

#[test]
fn test_where_null_never_matches() {
    let mut temp_db = TempDatabase::with_prefix("select_null");
    let db = setup(&mut temp_db);

    // Clara's age is NULL: no operator can select her through age
    for condition in [
        Condition::eq("age", Literal::Integer(0)),
        Condition::ne("age", Literal::Integer(0)),
        Condition::lt("age", Literal::Integer(1000)),
        Condition::ge("age", Literal::Integer(-1000)),
    ] {
        let (_, rows, _) = unpack(db.execute(select(Projection::All, vec![condition])).unwrap());
        assert!(
            rows.iter().all(|r| r[0] != Value::Integer(3)),
            "row with NULL age must never match"
        );
    }

    // a NULL literal matches nothing either
    let conditions = vec![Condition::eq("age", Literal::Null)];
    let (_, rows, _) = unpack(db.execute(select(Projection::All, conditions)).unwrap());
    assert!(rows.is_empty());
}

#[test]
fn test_where_integer_against_numeric_string() {
    let mut temp_db = TempDatabase::with_prefix("select_coerce_int");
    let db = setup(&mut temp_db);

    let conditions = vec![Condition::eq("age", Literal::Text("30".to_string()))];
    let (_, rows, _) = unpack(db.execute(select(Projection::All, conditions)).unwrap());
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0][0], Value::Integer(1));

    // an unparsable string matches no integer, under any operator
    let conditions = vec![Condition::ne("age", Literal::Text("old".to_string()))];
    let (_, rows, _) = unpack(db.execute(select(Projection::All, conditions)).unwrap());
    assert!(rows.is_empty());
}

#[test]
fn test_where_text_compares_lexicographically() {
    let mut temp_db = TempDatabase::with_prefix("select_lex");
    let db = setup(&mut temp_db);

    let conditions = vec![Condition::gt("name", Literal::Text("Amos".to_string()))];
    let (_, rows, _) = unpack(db.execute(select(Projection::All, conditions)).unwrap());
    let ids: Vec<Value> = rows.iter().map(|r| r[0].clone()).collect();
    // Bob and Clara sort after "Amos"; Alice doesn't; id 4 has NULL name
    assert_eq!(ids, vec![Value::Integer(2), Value::Integer(3)]);
}

#[test]
fn test_where_conjunction() {
    let mut temp_db = TempDatabase::with_prefix("select_and");
    let db = setup(&mut temp_db);

    let conditions = vec![
        Condition::ge("age", Literal::Integer(25)),
        Condition::lt("id", Literal::Integer(2)),
    ];
    let (_, rows, message) = unpack(db.execute(select(Projection::All, conditions)).unwrap());
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0][0], Value::Integer(1));
    assert_eq!(message, "1 row(s)");
}

#[test]
fn test_where_column_matched_case_insensitively() {
    let mut temp_db = TempDatabase::with_prefix("select_where_case");
    let db = setup(&mut temp_db);

    let conditions = vec![Condition::eq("NAME", Literal::Text("Alice".to_string()))];
    let (_, rows, _) = unpack(db.execute(select(Projection::All, conditions)).unwrap());
    assert_eq!(rows.len(), 1);
}
