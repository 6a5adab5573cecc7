#[cfg(test)]
mod facade_tests {
    use super::super::users::AdminSeed;
    use super::super::*;
    use crate::auth::PasswordHasher;
    use crate::models::*;
    use pretty_assertions::assert_eq;

    fn facade() -> HbnbFacade {
        HbnbFacade::in_memory(PasswordHasher::new(1_000).unwrap())
    }

    fn new_user(first: &str, email: &str) -> NewUser {
        NewUser {
            first_name: first.to_string(),
            last_name: "Tester".to_string(),
            email: email.to_string(),
            password: "password123".to_string(),
            is_admin: false,
        }
    }

    fn place_input(title: &str) -> PlaceInput {
        PlaceInput {
            title: title.to_string(),
            description: Some("  Sunny flat  ".to_string()),
            price: 120.0,
            latitude: 43.6,
            longitude: 1.44,
            owner_id: None,
            amenities: vec![],
        }
    }

    fn review_input(place_id: &str, rating: i64) -> ReviewInput {
        ReviewInput {
            text: "Lovely stay".to_string(),
            rating,
            place_id: place_id.to_string(),
            user_id: None,
        }
    }

    fn actor_for(user: &User) -> Actor {
        Actor::new(user.id.clone(), user.is_admin)
    }

    async fn admin(facade: &HbnbFacade) -> Actor {
        let (user, _) = facade
            .ensure_admin(&AdminSeed::new("admin@hbnb.com", "admin1234"))
            .await
            .unwrap();
        actor_for(&user)
    }

    #[tokio::test]
    async fn test_register_normalizes_and_never_grants_admin() {
        let facade = facade();
        let mut input = new_user(" Ada ", "Ada@Example.com");
        input.is_admin = true;

        let user = facade.register_user(input).await.unwrap();
        assert_eq!(user.first_name, "Ada");
        assert_eq!(user.email, "ada@example.com");
        assert!(!user.is_admin);
        assert!(user.password_hash.starts_with("pbkdf2_sha256$1000$"));
    }

    #[tokio::test]
    async fn test_duplicate_email_conflicts() {
        let facade = facade();
        facade.register_user(new_user("Ada", "ada@example.com")).await.unwrap();

        let err = facade
            .register_user(new_user("Eve", "ADA@example.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_create_user_requires_admin() {
        let facade = facade();
        let user = facade.register_user(new_user("Ada", "ada@example.com")).await.unwrap();

        let err = facade
            .create_user(&actor_for(&user), new_user("Bob", "bob@example.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Forbidden(_)));

        let admin = admin(&facade).await;
        let mut input = new_user("Bob", "bob@example.com");
        input.is_admin = true;
        let created = facade.create_user(&admin, input).await.unwrap();
        assert!(created.is_admin);
    }

    #[tokio::test]
    async fn test_authenticate() {
        let facade = facade();
        let user = facade.register_user(new_user("Ada", "ada@example.com")).await.unwrap();

        let found = facade.authenticate("ADA@example.com", "password123").await.unwrap();
        assert_eq!(found.id, user.id);

        for (email, password) in [
            ("ada@example.com", "wrong-password"),
            ("nobody@example.com", "password123"),
        ] {
            match facade.authenticate(email, password).await {
                Err(DomainError::Unauthorized(msg)) => {
                    assert_eq!(msg, "Invalid email or password")
                }
                other => panic!("Expected Unauthorized, got {:?}", other.map(|u| u.id)),
            }
        }
    }

    #[tokio::test]
    async fn test_update_user_rules() {
        let facade = facade();
        let ada = facade.register_user(new_user("Ada", "ada@example.com")).await.unwrap();
        let bob = facade.register_user(new_user("Bob", "bob@example.com")).await.unwrap();
        let ada_actor = actor_for(&ada);

        let renamed = facade
            .update_user(
                &ada_actor,
                &ada.id,
                UserUpdate {
                    first_name: Some("Augusta".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(renamed.first_name, "Augusta");
        assert!(renamed.updated_at >= ada.updated_at);

        let err = facade
            .update_user(
                &ada_actor,
                &ada.id,
                UserUpdate {
                    email: Some("new@example.com".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));

        let err = facade
            .update_user(&ada_actor, &bob.id, UserUpdate::default())
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Forbidden(_)));

        let admin = admin(&facade).await;
        let err = facade
            .update_user(
                &admin,
                &bob.id,
                UserUpdate {
                    email: Some("ada@example.com".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));

        let updated = facade
            .update_user(
                &admin,
                &bob.id,
                UserUpdate {
                    password: Some("new-password".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.id, bob.id);
        assert!(facade.authenticate("bob@example.com", "new-password").await.is_ok());
    }

    #[tokio::test]
    async fn test_ensure_admin_is_idempotent() {
        let facade = facade();
        let seed = AdminSeed::new("admin@hbnb.com", "admin1234");

        let (first, created) = facade.ensure_admin(&seed).await.unwrap();
        assert!(created);
        assert!(first.is_admin);

        let (second, created) = facade.ensure_admin(&seed).await.unwrap();
        assert!(!created);
        assert_eq!(second.id, first.id);
        assert_eq!(facade.list_users().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_ensure_admin_does_not_promote_existing_user() {
        let facade = facade();
        let squatter = facade
            .register_user(new_user("Mallory", "admin@hbnb.com"))
            .await
            .unwrap();

        let (user, created) = facade
            .ensure_admin(&AdminSeed::new("admin@hbnb.com", "admin1234"))
            .await
            .unwrap();
        assert!(!created);
        assert_eq!(user.id, squatter.id);
        assert!(!user.is_admin);
        assert!(!facade.get_user(&squatter.id).await.unwrap().is_admin);
    }

    fn exactly_one_conflict<T: std::fmt::Debug>(
        a: DomainResult<T>,
        b: DomainResult<T>,
    ) {
        let err = match (a, b) {
            (Ok(_), Err(e)) | (Err(e), Ok(_)) => e,
            other => panic!("expected one success and one failure, got {:?}", other),
        };
        assert!(matches!(err, DomainError::Conflict(_)), "got {:?}", err);
    }

    /// Races two writers on every unique key and checks only one wins
    async fn check_concurrent_unique_keys(facade: HbnbFacade) {
        let (a, b) = tokio::join!(
            facade.register_user(new_user("Ada", "same@example.com")),
            facade.register_user(new_user("Eve", "SAME@example.com")),
        );
        exactly_one_conflict(a, b);
        let same_email = facade
            .list_users()
            .await
            .unwrap()
            .into_iter()
            .filter(|u| u.email == "same@example.com")
            .count();
        assert_eq!(same_email, 1);

        let admin = admin(&facade).await;
        let (a, b) = tokio::join!(
            facade.create_amenity(&admin, AmenityInput { name: "WiFi".to_string() }),
            facade.create_amenity(&admin, AmenityInput { name: "WiFi".to_string() }),
        );
        exactly_one_conflict(a, b);
        assert_eq!(facade.list_amenities().await.unwrap().len(), 1);

        let owner = facade.register_user(new_user("Olga", "olga@example.com")).await.unwrap();
        let guest = facade.register_user(new_user("Gus", "gus@example.com")).await.unwrap();
        let place = facade
            .create_place(&actor_for(&owner), place_input("Loft"))
            .await
            .unwrap();
        let guest = actor_for(&guest);
        let (a, b) = tokio::join!(
            facade.create_review(&guest, review_input(&place.id, 5)),
            facade.create_review(&guest, review_input(&place.id, 1)),
        );
        exactly_one_conflict(a, b);
        assert_eq!(facade.list_place_reviews(&place.id).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_concurrent_duplicates_rejected_in_memory() {
        check_concurrent_unique_keys(facade()).await;
    }

    #[tokio::test]
    async fn test_concurrent_duplicates_rejected_in_sqlite() {
        let pool = crate::db::create_memory_pool().await.unwrap();
        let facade = HbnbFacade::new(
            crate::db::Repositories::sqlite(pool),
            PasswordHasher::new(1_000).unwrap(),
        );
        check_concurrent_unique_keys(facade).await;
    }

    #[tokio::test]
    async fn test_amenities_admin_only_and_unique() {
        let facade = facade();
        let user = facade.register_user(new_user("Ada", "ada@example.com")).await.unwrap();
        let admin = admin(&facade).await;

        let err = facade
            .create_amenity(&actor_for(&user), AmenityInput { name: "WiFi".to_string() })
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Forbidden(_)));

        let wifi = facade
            .create_amenity(&admin, AmenityInput { name: " WiFi ".to_string() })
            .await
            .unwrap();
        assert_eq!(wifi.name, "WiFi");

        let err = facade
            .create_amenity(&admin, AmenityInput { name: "WiFi".to_string() })
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));

        // Renaming to its own name is fine
        facade
            .update_amenity(&admin, &wifi.id, AmenityInput { name: "WiFi".to_string() })
            .await
            .unwrap();

        let err = facade
            .create_amenity(&admin, AmenityInput { name: "x".repeat(51) })
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[tokio::test]
    async fn test_create_place_rules() {
        let facade = facade();
        let ada = facade.register_user(new_user("Ada", "ada@example.com")).await.unwrap();
        let bob = facade.register_user(new_user("Bob", "bob@example.com")).await.unwrap();
        let admin = admin(&facade).await;
        let wifi = facade
            .create_amenity(&admin, AmenityInput { name: "WiFi".to_string() })
            .await
            .unwrap();

        let mut input = place_input("Loft");
        input.amenities = vec![wifi.id.clone(), wifi.id.clone()];
        let place = facade.create_place(&actor_for(&ada), input).await.unwrap();
        assert_eq!(place.owner_id, ada.id);
        assert_eq!(place.description.as_deref(), Some("Sunny flat"));
        assert_eq!(place.amenity_ids, vec![wifi.id.clone()]);

        let mut input = place_input("Not mine");
        input.owner_id = Some(bob.id.clone());
        let err = facade.create_place(&actor_for(&ada), input).await.unwrap_err();
        assert!(matches!(err, DomainError::Forbidden(_)));

        let mut input = place_input("Ghost amenity");
        input.amenities = vec!["missing".to_string()];
        let err = facade.create_place(&actor_for(&ada), input).await.unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));

        let mut input = place_input("Off the map");
        input.latitude = 91.0;
        let err = facade.create_place(&actor_for(&ada), input).await.unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));

        let mut input = place_input("For Bob");
        input.owner_id = Some(bob.id.clone());
        let for_bob = facade.create_place(&admin, input).await.unwrap();
        assert_eq!(for_bob.owner_id, bob.id);
    }

    #[tokio::test]
    async fn test_update_place_rules() {
        let facade = facade();
        let ada = facade.register_user(new_user("Ada", "ada@example.com")).await.unwrap();
        let bob = facade.register_user(new_user("Bob", "bob@example.com")).await.unwrap();
        let place = facade
            .create_place(&actor_for(&ada), place_input("Loft"))
            .await
            .unwrap();

        let err = facade
            .update_place(&actor_for(&bob), &place.id, PlaceUpdate::default())
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Forbidden(_)));

        let err = facade
            .update_place(
                &actor_for(&ada),
                &place.id,
                PlaceUpdate {
                    owner_id: Some(bob.id.clone()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Forbidden(_)));

        let updated = facade
            .update_place(
                &actor_for(&ada),
                &place.id,
                PlaceUpdate {
                    price: Some(99.0),
                    description: Some("   ".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.price, 99.0);
        assert_eq!(updated.description, None);
        assert_eq!(updated.title, "Loft");

        let err = facade
            .update_place(
                &actor_for(&ada),
                "missing",
                PlaceUpdate::default(),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_review_rules() {
        let facade = facade();
        let owner = facade.register_user(new_user("Ada", "ada@example.com")).await.unwrap();
        let guest = facade.register_user(new_user("Bob", "bob@example.com")).await.unwrap();
        let other = facade.register_user(new_user("Cy", "cy@example.com")).await.unwrap();
        let place = facade
            .create_place(&actor_for(&owner), place_input("Loft"))
            .await
            .unwrap();

        let err = facade
            .create_review(&actor_for(&owner), review_input(&place.id, 5))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));

        let review = facade
            .create_review(&actor_for(&guest), review_input(&place.id, 4))
            .await
            .unwrap();
        assert_eq!(review.user_id, guest.id);

        let err = facade
            .create_review(&actor_for(&guest), review_input(&place.id, 2))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Conflict(_)));

        let mut on_behalf = review_input(&place.id, 3);
        on_behalf.user_id = Some(guest.id.clone());
        let err = facade
            .create_review(&actor_for(&other), on_behalf)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Forbidden(_)));

        let err = facade
            .create_review(&actor_for(&other), review_input(&place.id, 6))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));

        let err = facade
            .create_review(&actor_for(&other), review_input("missing", 3))
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));

        let err = facade
            .update_review(&actor_for(&other), &review.id, ReviewUpdate::default())
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Forbidden(_)));

        let updated = facade
            .update_review(
                &actor_for(&guest),
                &review.id,
                ReviewUpdate {
                    rating: Some(5),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.rating, 5);
        assert_eq!(updated.text, "Lovely stay");

        facade.delete_review(&actor_for(&guest), &review.id).await.unwrap();
        assert!(matches!(
            facade.get_review(&review.id).await,
            Err(DomainError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_place_details_and_summaries() {
        let facade = facade();
        let owner = facade.register_user(new_user("Ada", "ada@example.com")).await.unwrap();
        let admin = admin(&facade).await;
        let wifi = facade
            .create_amenity(&admin, AmenityInput { name: "WiFi".to_string() })
            .await
            .unwrap();
        let mut input = place_input("Loft");
        input.amenities = vec![wifi.id.clone()];
        let place = facade.create_place(&actor_for(&owner), input).await.unwrap();
        let bare = facade
            .create_place(&actor_for(&owner), place_input("Shed"))
            .await
            .unwrap();

        for (i, rating) in [5, 4, 4].into_iter().enumerate() {
            let guest = facade
                .register_user(new_user("Guest", &format!("guest{}@example.com", i)))
                .await
                .unwrap();
            facade
                .create_review(&actor_for(&guest), review_input(&place.id, rating))
                .await
                .unwrap();
        }

        let details = facade.get_place_details(&place.id).await.unwrap();
        assert_eq!(details.owner.full_name, "Ada Tester");
        assert_eq!(details.amenities, vec![wifi]);
        assert_eq!(details.reviews.len(), 3);
        assert_eq!(details.rating.average_rating, Some(4.33));
        assert_eq!(details.rating.review_count, 3);

        let summaries = facade.list_places().await.unwrap();
        assert_eq!(summaries.len(), 2);
        let loft = summaries.iter().find(|s| s.id == place.id).unwrap();
        assert_eq!(loft.rating.review_count, 3);
        let shed = summaries.iter().find(|s| s.id == bare.id).unwrap();
        assert_eq!(shed.rating.average_rating, None);

        assert_eq!(facade.list_place_reviews(&place.id).await.unwrap().len(), 3);
        assert!(matches!(
            facade.list_place_reviews("missing").await,
            Err(DomainError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_delete_user_cascades() {
        let facade = facade();
        let owner = facade.register_user(new_user("Ada", "ada@example.com")).await.unwrap();
        let guest = facade.register_user(new_user("Bob", "bob@example.com")).await.unwrap();
        let place = facade
            .create_place(&actor_for(&owner), place_input("Loft"))
            .await
            .unwrap();
        let guest_place = facade
            .create_place(&actor_for(&guest), place_input("Cabin"))
            .await
            .unwrap();
        facade
            .create_review(&actor_for(&guest), review_input(&place.id, 4))
            .await
            .unwrap();
        facade
            .create_review(&actor_for(&owner), review_input(&guest_place.id, 5))
            .await
            .unwrap();

        let err = facade
            .delete_user(&actor_for(&guest), &owner.id)
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Forbidden(_)));

        facade.delete_user(&actor_for(&owner), &owner.id).await.unwrap();

        assert!(matches!(
            facade.get_user(&owner.id).await,
            Err(DomainError::NotFound(_))
        ));
        let places = facade.list_places().await.unwrap();
        assert_eq!(places.len(), 1);
        assert_eq!(places[0].id, guest_place.id);
        assert!(facade.list_reviews().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_amenity_detaches_from_places() {
        let facade = facade();
        let owner = facade.register_user(new_user("Ada", "ada@example.com")).await.unwrap();
        let admin = admin(&facade).await;
        let wifi = facade
            .create_amenity(&admin, AmenityInput { name: "WiFi".to_string() })
            .await
            .unwrap();
        let pool = facade
            .create_amenity(&admin, AmenityInput { name: "Pool".to_string() })
            .await
            .unwrap();
        let mut input = place_input("Loft");
        input.amenities = vec![wifi.id.clone(), pool.id.clone()];
        let place = facade.create_place(&actor_for(&owner), input).await.unwrap();

        facade.delete_amenity(&admin, &wifi.id).await.unwrap();

        let stored = facade.get_place(&place.id).await.unwrap();
        assert_eq!(stored.amenity_ids, vec![pool.id]);
        assert_eq!(facade.list_amenities().await.unwrap().len(), 1);
    }

    #[test]
    fn test_database_errors_map_to_domain_errors() {
        use crate::db::DatabaseError;

        assert!(matches!(
            DomainError::from(DatabaseError::IntegrityError("dup".to_string())),
            DomainError::Conflict(_)
        ));
        assert!(matches!(
            DomainError::from(DatabaseError::NotFound("x".to_string())),
            DomainError::NotFound(_)
        ));
        assert!(matches!(
            DomainError::from(DatabaseError::ConnectionError("down".to_string())),
            DomainError::Database(_)
        ));
    }
}
