/// The single record query.
///
/// Fetches the signed-in user's profile, XP transactions (bootcamp-go
/// entries are already excluded server-side; the finer piscine rule runs
/// locally), finished progress records, audits done, and the event
/// memberships for the campus event path passed as `$eventPath`.
pub const STUDENT_RECORD_QUERY: &str = r#"
query StudentRecord($eventPath: String!) {
  user {
    id
    login
    attrs
    auditRatio
    totalUp
    totalDown
    avatarUrl
    campus
    createdAt
    public {
      firstName
      lastName
    }
    transactions(
      where: {
        type: { _eq: "xp" }
        _and: [{ path: { _nlike: "%piscine-go%" } }]
      }
      order_by: { createdAt: asc }
    ) {
      id
      type
      amount
      objectId
      createdAt
      path
      object {
        name
        type
      }
    }
    progresses(where: { isDone: { _eq: true } }, order_by: { updatedAt: desc }) {
      id
      objectId
      grade
      createdAt
      updatedAt
      path
      object {
        name
        type
      }
    }
    audits {
      id
      grade
      createdAt
    }
  }
  event_user(where: { event: { path: { _eq: $eventPath } } }) {
    level
    eventId
    userLogin
    event {
      path
    }
  }
}
"#;

/// Variables object for [`STUDENT_RECORD_QUERY`].
pub fn variables(event_path: &str) -> serde_json::Value {
    serde_json::json!({ "eventPath": event_path })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_declares_the_event_path_variable() {
        assert!(STUDENT_RECORD_QUERY.contains("$eventPath: String!"));
        assert!(STUDENT_RECORD_QUERY.contains("_eq: $eventPath"));
        assert_eq!(variables("/rouen/div-01")["eventPath"], "/rouen/div-01");
    }

    #[test]
    fn query_requests_every_collection() {
        for field in ["transactions(", "progresses(", "audits {", "event_user("] {
            assert!(STUDENT_RECORD_QUERY.contains(field), "missing {field}");
        }
    }
}
