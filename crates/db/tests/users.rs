use bakehouse_core::roles::{ROLE_ADMIN, ROLE_BAKER};
use bakehouse_db::models::user::CreateUser;
use bakehouse_db::repositories::UserRepo;
use sqlx::PgPool;

fn new_user(email: &str, role: &str, is_approved: bool) -> CreateUser {
    CreateUser {
        email: email.to_string(),
        password_hash: "$argon2id$v=19$m=19456,t=2,p=1$placeholder".to_string(),
        role: role.to_string(),
        is_approved,
    }
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_pending_user_approval_flow(pool: PgPool) {
    let admin = UserRepo::create(&pool, &new_user("jefa@bakehouse.test", ROLE_ADMIN, true))
        .await
        .unwrap();
    let baker = UserRepo::create(&pool, &new_user("panadero@bakehouse.test", ROLE_BAKER, false))
        .await
        .unwrap();
    assert!(!baker.is_approved);

    let pending = UserRepo::list_pending(&pool).await.unwrap();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].id, baker.id);

    let approved = UserRepo::approve(&pool, baker.id, admin.id).await.unwrap().unwrap();
    assert!(approved.is_approved);
    assert_eq!(approved.approved_by, Some(admin.id));
    assert!(approved.approved_at.is_some());
    assert!(UserRepo::list_pending(&pool).await.unwrap().is_empty());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_find_by_email_ignores_case(pool: PgPool) {
    let user = UserRepo::create(&pool, &new_user("maria@bakehouse.test", ROLE_BAKER, true))
        .await
        .unwrap();
    let found = UserRepo::find_by_email(&pool, "Maria@Bakehouse.TEST")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(found.id, user.id);
    assert!(UserRepo::find_by_email(&pool, "nadie@bakehouse.test").await.unwrap().is_none());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_duplicate_email_rejected(pool: PgPool) {
    UserRepo::create(&pool, &new_user("ana@bakehouse.test", ROLE_BAKER, false))
        .await
        .unwrap();
    let err = UserRepo::create(&pool, &new_user("ana@bakehouse.test", ROLE_BAKER, false))
        .await
        .unwrap_err();
    assert_eq!(
        err.as_database_error().and_then(|e| e.constraint()),
        Some("uq_users_email")
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_delete_and_count_admins(pool: PgPool) {
    let admin = UserRepo::create(&pool, &new_user("jefa@bakehouse.test", ROLE_ADMIN, true))
        .await
        .unwrap();
    let baker = UserRepo::create(&pool, &new_user("luis@bakehouse.test", ROLE_BAKER, false))
        .await
        .unwrap();
    assert_eq!(UserRepo::count_admins(&pool).await.unwrap(), 1);

    assert!(UserRepo::delete(&pool, baker.id).await.unwrap());
    assert!(!UserRepo::delete(&pool, baker.id).await.unwrap());
    assert!(UserRepo::find_by_id(&pool, admin.id).await.unwrap().is_some());
}
