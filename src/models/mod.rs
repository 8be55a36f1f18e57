mod comment;
mod follow;
mod group;
mod post;
mod user;

pub use comment::Comment;
pub use follow::Follow;
pub use group::Group;
pub use post::{Post, PostFields};
pub use user::{User, is_valid_username};

#[cfg(test)]
mod tests {
    use sqlx::SqlitePool;

    use super::*;
    use crate::db;

    async fn pool() -> SqlitePool {
        let db_pool = db::connect("sqlite::memory:").await.unwrap();
        db::init(&db_pool).await.unwrap();
        db_pool
    }

    async fn group(db_pool: &SqlitePool, slug: &str) -> Group {
        sqlx::query("INSERT INTO post_groups (title,slug,description) VALUES (?,?,?)")
            .bind(format!("Group {slug}"))
            .bind(slug)
            .bind("about things")
            .execute(db_pool)
            .await
            .unwrap();
        Group::find_by_slug(db_pool, slug).await.unwrap().unwrap()
    }

    fn text(text: &str) -> PostFields<'_> {
        PostFields { text, group_id: None, image: None }
    }

    #[tokio::test]
    async fn labels() {
        let db_pool = pool().await;
        let author = User::get_or_create(&db_pool, "susel").await.unwrap();
        let group = group(&db_pool, "cats").await;

        let id = Post::create(&db_pool, author.id, text("Тестовый пост длиннее пятнадцати")).await.unwrap();
        let post = Post::find(&db_pool, id).await.unwrap().unwrap();
        assert_eq!(post.to_string(), "Тестовый пост д");
        assert_eq!(group.to_string(), "Group cats");

        Comment::create(&db_pool, id, author.id, "nice").await.unwrap();
        let comments = Comment::list_for_post(&db_pool, id).await.unwrap();
        assert_eq!(comments[0].to_string(), "nice");
    }

    #[tokio::test]
    async fn deleting_a_group_keeps_its_posts() {
        let db_pool = pool().await;
        let author = User::get_or_create(&db_pool, "susel").await.unwrap();
        let group = group(&db_pool, "cats").await;

        let fields = PostFields { text: "meow", group_id: Some(group.id), image: None };
        let id = Post::create(&db_pool, author.id, fields).await.unwrap();
        assert_eq!(Post::find(&db_pool, id).await.unwrap().unwrap().group, Some(group.clone()));

        sqlx::query("DELETE FROM post_groups WHERE id=?")
            .bind(group.id)
            .execute(&db_pool)
            .await
            .unwrap();

        let post = Post::find(&db_pool, id).await.unwrap().unwrap();
        assert_eq!(post.group, None);
        assert_eq!(post.text, "meow");
    }

    #[tokio::test]
    async fn deleting_a_post_removes_its_comments() {
        let db_pool = pool().await;
        let author = User::get_or_create(&db_pool, "susel").await.unwrap();
        let id = Post::create(&db_pool, author.id, text("hello")).await.unwrap();
        Comment::create(&db_pool, id, author.id, "first").await.unwrap();
        Comment::create(&db_pool, id, author.id, "second").await.unwrap();

        assert!(Post::delete(&db_pool, id).await.unwrap());
        assert!(!Post::delete(&db_pool, id).await.unwrap());

        let left: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM comments")
            .fetch_one(&db_pool)
            .await
            .unwrap();
        assert_eq!(left, 0);
    }

    #[tokio::test]
    async fn listings_are_newest_first() {
        let db_pool = pool().await;
        let author = User::get_or_create(&db_pool, "susel").await.unwrap();
        for n in 0..3 {
            Post::create(&db_pool, author.id, text(&format!("post {n}"))).await.unwrap();
        }

        let posts = Post::list_all(&db_pool, 10, 0).await.unwrap();
        let texts: Vec<_> = posts.iter().map(|p| p.text.as_str()).collect();
        assert_eq!(texts, ["post 2", "post 1", "post 0"]);

        let second = Post::list_by_author(&db_pool, author.id, 1, 1).await.unwrap();
        assert_eq!(second[0].text, "post 1");
    }

    #[tokio::test]
    async fn follow_edges_are_unique() {
        let db_pool = pool().await;
        let reader = User::get_or_create(&db_pool, "reader").await.unwrap();
        let author = User::get_or_create(&db_pool, "author").await.unwrap();

        assert!(Follow::follow(&db_pool, reader.id, author.id).await.unwrap());
        assert!(!Follow::follow(&db_pool, reader.id, author.id).await.unwrap());
        assert!(!Follow::follow(&db_pool, reader.id, reader.id).await.unwrap());

        let edges: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM follows")
            .fetch_one(&db_pool)
            .await
            .unwrap();
        assert_eq!(edges, 1);

        // the schema itself refuses duplicates and self-edges
        let duplicate = sqlx::query("INSERT INTO follows (user_id,author_id) VALUES (?,?)")
            .bind(reader.id)
            .bind(author.id)
            .execute(&db_pool)
            .await;
        assert!(duplicate.is_err());
        let selfie = sqlx::query("INSERT INTO follows (user_id,author_id) VALUES (?,?)")
            .bind(author.id)
            .bind(author.id)
            .execute(&db_pool)
            .await;
        assert!(selfie.is_err());

        assert!(Follow::is_following(&db_pool, reader.id, author.id).await.unwrap());
        assert!(!Follow::is_following(&db_pool, author.id, reader.id).await.unwrap());
        assert_eq!(Follow::followed_authors(&db_pool, reader.id).await.unwrap(), vec![author.clone()]);

        assert_eq!(Follow::unfollow(&db_pool, reader.id, author.id).await.unwrap(), 1);
        assert_eq!(Follow::unfollow(&db_pool, reader.id, author.id).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn feed_only_has_followed_authors() {
        let db_pool = pool().await;
        let reader = User::get_or_create(&db_pool, "reader").await.unwrap();
        let followed = User::get_or_create(&db_pool, "followed").await.unwrap();
        let stranger = User::get_or_create(&db_pool, "stranger").await.unwrap();
        Post::create(&db_pool, followed.id, text("from followed")).await.unwrap();
        Post::create(&db_pool, stranger.id, text("from stranger")).await.unwrap();
        Follow::follow(&db_pool, reader.id, followed.id).await.unwrap();

        assert_eq!(Post::count_feed(&db_pool, reader.id).await.unwrap(), 1);
        let feed = Post::list_feed(&db_pool, reader.id, 10, 0).await.unwrap();
        assert_eq!(feed.len(), 1);
        assert_eq!(feed[0].author, followed);
    }
}
