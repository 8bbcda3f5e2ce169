//
//  sample.rs
//  filedb
//
//  Created by the filedb team
//

//! Sample records used by the `seed` command and the end-to-end tests.

use serde::{Deserialize, Serialize};

/// Collection the sample users are written to.
pub const USERS: &str = "users";

/// Postal address of a [`User`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Address {
    pub city: String,
    pub state: String,
    pub country: String,
    pub pincode: u32,
}

/// A user record, stored under its name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct User {
    pub name: String,
    pub age: u32,
    pub contact: String,
    pub company: String,
    pub address: Address,
}

impl User {
    fn new(name: &str, age: u32, contact: &str, company: &str, address: Address) -> Self {
        Self {
            name: name.to_string(),
            age,
            contact: contact.to_string(),
            company: company.to_string(),
            address,
        }
    }
}

impl Address {
    fn new(city: &str, state: &str, country: &str, pincode: u32) -> Self {
        Self {
            city: city.to_string(),
            state: state.to_string(),
            country: country.to_string(),
            pincode,
        }
    }
}

/// Six distinct users.
pub fn sample_users() -> Vec<User> {
    vec![
        User::new("Ali", 22, "8768876", "Google", Address::new("New Delhi", "New Delhi", "India", 110019)),
        User::new("Sawil", 24, "8004814729", "Gartner", Address::new("Lucknow", "Uttar Pradesh", "India", 226002)),
        User::new("Yash", 24, "7637467", "Jahaaz", Address::new("Mumbai", "Maharashtra", "India", 656474)),
        User::new("Wasil", 26, "988857", "Salesforce", Address::new("Hyderabad", "Telengana", "India", 765645)),
        User::new("Karan", 24, "985664", "Permify", Address::new("Bangalore", "Karnataka", "India", 1986543)),
        User::new("Houdin", 24, "0000001", "Lisadia Tech", Address::new("New York City", "New York", "USA", 111111)),
    ]
}
