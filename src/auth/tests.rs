//! Tests for auth module

#[cfg(test)]
mod tests {
    use crate::auth::handlers::issue_token;
    use crate::auth::models::Claims;
    use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};

    #[test]
    fn test_issued_token_round_trips() {
        let secret = "test-secret";
        let token = issue_token("U_K7NP3X", secret).expect("token should be issued");

        let decoded = decode::<Claims>(
            &token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &Validation::new(Algorithm::HS256),
        )
        .expect("token should decode with the same secret");

        assert_eq!(decoded.claims.sub, "U_K7NP3X");
    }

    #[test]
    fn test_token_rejected_with_wrong_secret() {
        let token = issue_token("U_K7NP3X", "secret-a").expect("token should be issued");

        let result = decode::<Claims>(
            &token,
            &DecodingKey::from_secret(b"secret-b"),
            &Validation::new(Algorithm::HS256),
        );

        assert!(result.is_err());
    }
}
