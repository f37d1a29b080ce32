// example/src/main.rs

#[allow(dead_code)]
mod generated {
    include!(concat!(env!("OUT_DIR"), "/people.rs"));
}

use std::collections::HashMap;
use std::error::Error;

// Bring the generated types into scope:
use generated::{Address, Level, Person, Role, LIMITS_MAX_FRIENDS};

fn main() -> Result<(), Box<dyn Error>> {
    let mut properties = HashMap::new();
    properties.insert("team".to_string(), "storage".to_string());

    let mut scores = HashMap::new();
    scores.insert(1, 0.5);
    scores.insert(2, 12.0);

    let person = Person::new(
        "Ada".to_string(),
        36,
        Role::ADMIN,
        Level::HIGH,
        vec!["Grace".to_string(), "Alan".to_string()],
        properties,
        vec![Address::new("1 Main St".to_string(), "London".to_string())],
        scores,
    );

    let json = person.to_json()?;
    println!("json = {}", json);

    let decoded = Person::from_json(&json)?;
    assert_eq!(decoded, person);

    println!("friends = {} of at most {}", decoded.friends.len(), LIMITS_MAX_FRIENDS);
    println!("role    = {:?} ({})", decoded.role, decoded.role.value());

    for level in Level::ALL {
        println!("  Level[{}] = {:?} ({})", level.index_of(), level, level.value());
    }

    match Level::value_at(7) {
        Ok(level) => println!("unexpected level {:?}", level),
        Err(e) => println!("lookup failed: {}", e),
    }

    Ok(())
}
