mod common;

use common::{Harness, comment, post};
use citybuzz_application::NoticeKind;
use citybuzz_core::confirm::FixedAnswer;
use citybuzz_core::error::CityBuzzError;
use citybuzz_core::i18n::Locale;

#[tokio::test]
async fn test_refresh_loads_first_page() {
    let h = Harness::signed_in("camille", vec![post("a", 0, false), post("b", 2, true)], vec![]).await;

    h.client.feed.refresh().await.unwrap();

    let state = h.client.feed.snapshot().await;
    assert_eq!(state.posts.len(), 2);
    assert_eq!(state.page, 1);
    assert!(!state.has_more);
}

#[tokio::test]
async fn test_load_more_appends_next_page() {
    let posts: Vec<_> = (0..15).map(|i| post(&format!("post {i}"), 0, false)).collect();
    let h = Harness::signed_in("camille", posts, vec![]).await;

    h.client.feed.refresh().await.unwrap();
    assert!(h.client.feed.snapshot().await.has_more);

    let added = h.client.feed.load_more().await.unwrap();
    assert_eq!(added, 5);
    let state = h.client.feed.snapshot().await;
    assert_eq!(state.posts.len(), 15);
    assert_eq!(state.posts[10].content, "post 10");
    assert!(!state.has_more);
}

#[tokio::test]
async fn test_create_post_inserts_at_head_and_clears_draft() {
    let h = Harness::signed_in("camille", vec![post("older", 0, false)], vec![]).await;
    h.client.feed.refresh().await.unwrap();

    h.client.feed.set_post_draft("  Bonjour Rouen  ").await;
    let created = h.client.feed.create_post().await.unwrap();

    let posts = h.client.feed.posts().await;
    assert_eq!(posts[0].id, created.id);
    assert_eq!(posts[0].content, "Bonjour Rouen");
    // The server omitted the author, so the cached identity fills in
    assert_eq!(posts[0].author.as_ref().unwrap().username, "camille");
    assert!(h.client.feed.post_draft().await.is_empty());
}

#[tokio::test]
async fn test_failed_create_keeps_draft() {
    let h = Harness::signed_in("camille", vec![], vec![]).await;
    h.posts.script.fail_with(CityBuzzError::api(500, "database unavailable"));

    h.client.feed.set_post_draft("Bonjour").await;
    assert!(h.client.feed.create_post().await.is_err());

    assert!(h.client.feed.posts().await.is_empty());
    assert_eq!(h.client.feed.post_draft().await, "Bonjour");
    let notices = h.client.notices.active().await;
    assert_eq!(notices[0].kind, NoticeKind::Error);
    assert_eq!(notices[0].text, "Failed to create post");
}

#[tokio::test]
async fn test_like_then_unlike_sends_set_then_clear() {
    let target = post("Armada", 4, false);
    let id = target.id;
    let h = Harness::signed_in("camille", vec![target], vec![]).await;
    h.client.feed.refresh().await.unwrap();

    assert!(h.client.feed.toggle_like(id).await.unwrap());
    let liked = h.client.feed.post(id).await.unwrap();
    assert!(liked.is_liked);
    assert_eq!(liked.likes_count, 5);

    assert!(!h.client.feed.toggle_like(id).await.unwrap());
    let unliked = h.client.feed.post(id).await.unwrap();
    assert!(!unliked.is_liked);
    assert_eq!(unliked.likes_count, 4);

    assert_eq!(h.posts.script.calls()[1..], [format!("like {id}"), format!("unlike {id}")]);
}

#[tokio::test]
async fn test_failed_like_rolls_back() {
    let target = post("Armada", 4, false);
    let id = target.id;
    let h = Harness::signed_in("camille", vec![target], vec![]).await;
    h.client.feed.refresh().await.unwrap();
    h.posts.script.fail_with(CityBuzzError::network("connection reset"));

    assert!(h.client.feed.toggle_like(id).await.is_err());

    let restored = h.client.feed.post(id).await.unwrap();
    assert!(!restored.is_liked);
    assert_eq!(restored.likes_count, 4);
    assert_eq!(h.client.notices.active().await.len(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_hanging_like_times_out_and_rolls_back() {
    let target = post("Armada", 4, true);
    let id = target.id;
    let h = Harness::signed_in("camille", vec![target], vec![]).await;
    h.client.feed.refresh().await.unwrap();
    let _gate = h.posts.script.hold();

    let err = h.client.feed.toggle_like(id).await.unwrap_err();

    assert!(err.is_timeout());
    let restored = h.client.feed.post(id).await.unwrap();
    assert!(restored.is_liked);
    assert_eq!(restored.likes_count, 4);
    assert!(!h.client.feed.is_like_pending(id));
}

#[tokio::test]
async fn test_already_liked_conflict_keeps_liked_state() {
    let target = post("Armada", 4, false);
    let id = target.id;
    let h = Harness::signed_in("camille", vec![target], vec![]).await;
    h.client.feed.refresh().await.unwrap();
    h.posts.script.fail_with(CityBuzzError::api(409, "Post already liked"));

    assert!(h.client.feed.toggle_like(id).await.unwrap());
    assert!(h.client.feed.post(id).await.unwrap().is_liked);
}

#[tokio::test]
async fn test_refresh_during_failed_like_keeps_server_state() {
    let target = post("Armada", 4, false);
    let id = target.id;
    let h = Harness::signed_in("camille", vec![target], vec![]).await;
    h.client.feed.refresh().await.unwrap();
    h.posts.script.fail_with(CityBuzzError::network("connection reset"));
    let gate = h.posts.script.hold();

    let feed = &h.client.feed;
    let (liked, ()) = tokio::join!(feed.toggle_like(id), async {
        gate.entered.notified().await;
        // The like reached the server even though its response is lost
        {
            let mut stored = h.posts.feed.lock().unwrap();
            stored[0].is_liked = true;
            stored[0].likes_count = 5;
        }
        feed.refresh().await.unwrap();
        gate.release.notify_one();
    });

    assert!(liked.is_err());
    let post = h.client.feed.post(id).await.unwrap();
    assert!(post.is_liked);
    assert_eq!(post.likes_count, 5);
}

#[tokio::test]
async fn test_refresh_overwrites_optimistic_state() {
    let target = post("Armada", 4, false);
    let id = target.id;
    let h = Harness::signed_in("camille", vec![target], vec![]).await;
    h.client.feed.refresh().await.unwrap();

    h.client.feed.toggle_like(id).await.unwrap();
    // The server never recorded the like
    h.client.feed.refresh().await.unwrap();

    let post = h.client.feed.post(id).await.unwrap();
    assert!(!post.is_liked);
    assert_eq!(post.likes_count, 4);
}

#[tokio::test]
async fn test_anonymous_like_is_short_circuited() {
    let target = post("Armada", 4, false);
    let id = target.id;
    let h = Harness::anonymous(Locale::En, vec![target], vec![]).await;
    h.client.feed.refresh().await.unwrap();

    let err = h.client.feed.toggle_like(id).await.unwrap_err();

    assert!(err.is_login_required());
    assert_eq!(h.posts.script.count("like"), 0);
    let notices = h.client.notices.active().await;
    assert_eq!(notices[0].kind, NoticeKind::LoginPrompt);
    assert_eq!(notices[0].text, "Please log in to like posts");
}

#[tokio::test]
async fn test_comments_append_in_creation_order() {
    let target = post("Armada", 0, false);
    let id = target.id;
    let h = Harness::signed_in("camille", vec![target], vec![]).await;
    h.client.feed.refresh().await.unwrap();

    for text in ["premier", "deuxième", "troisième"] {
        h.client.feed.set_comment_draft(id, text).await;
        h.client.feed.submit_comment(id).await.unwrap();
    }

    let post = h.client.feed.post(id).await.unwrap();
    let contents: Vec<_> = post.comments.iter().map(|c| c.content.as_str()).collect();
    assert_eq!(contents, ["premier", "deuxième", "troisième"]);
    assert_eq!(post.comments_count, 3);
    assert!(h.client.feed.comment_draft(id).await.is_empty());
}

#[tokio::test]
async fn test_second_submission_while_pending_is_ignored() {
    let target = post("Armada", 0, false);
    let id = target.id;
    let h = Harness::signed_in("camille", vec![target], vec![]).await;
    h.client.feed.refresh().await.unwrap();
    h.client.feed.set_comment_draft(id, "J'y serai").await;
    let gate = h.posts.script.hold();

    let feed = &h.client.feed;
    let (first, second) = tokio::join!(feed.submit_comment(id), async {
        gate.entered.notified().await;
        assert!(feed.is_submitting_comment(id));
        let second = feed.submit_comment(id).await;
        gate.release.notify_one();
        second
    });

    assert!(first.is_ok());
    assert!(second.unwrap_err().is_in_flight());
    assert_eq!(h.posts.script.count("create_comment"), 1);
    assert_eq!(h.client.feed.post(id).await.unwrap().comments.len(), 1);
}

#[tokio::test]
async fn test_whitespace_comment_sends_nothing() {
    let target = post("Armada", 0, false);
    let id = target.id;
    let h = Harness::signed_in("camille", vec![target], vec![]).await;
    h.client.feed.refresh().await.unwrap();

    h.client.feed.set_comment_draft(id, "   ").await;
    let err = h.client.feed.submit_comment(id).await.unwrap_err();

    assert!(err.is_validation());
    assert_eq!(h.posts.script.count("create_comment"), 0);
    assert!(h.client.feed.post(id).await.unwrap().comments.is_empty());
    assert!(h.client.notices.active().await.is_empty());
}

#[tokio::test]
async fn test_failed_comment_keeps_draft() {
    let target = post("Armada", 0, false);
    let id = target.id;
    let h = Harness::signed_in("camille", vec![target], vec![]).await;
    h.client.feed.refresh().await.unwrap();
    h.posts.script.fail_with(CityBuzzError::api(500, "boom"));

    h.client.feed.set_comment_draft(id, "J'y serai").await;
    assert!(h.client.feed.submit_comment(id).await.is_err());

    assert_eq!(h.client.feed.comment_draft(id).await, "J'y serai");
    assert!(h.client.feed.post(id).await.unwrap().comments.is_empty());
    assert!(!h.client.feed.is_submitting_comment(id));
}

#[tokio::test]
async fn test_comments_are_fetched_once() {
    let target = post("Armada", 0, false);
    let id = target.id;
    let h = Harness::signed_in("camille", vec![target], vec![]).await;
    h.posts
        .comments
        .lock()
        .unwrap()
        .insert(id, vec![comment(id, "Super !")]);
    h.client.feed.refresh().await.unwrap();

    assert!(h.client.feed.toggle_comments(id).await.unwrap());
    assert!(!h.client.feed.toggle_comments(id).await.unwrap());
    assert!(h.client.feed.toggle_comments(id).await.unwrap());

    assert_eq!(h.posts.script.count("comments"), 1);
    assert!(h.client.feed.comments_visible(id).await);
    assert_eq!(h.client.feed.post(id).await.unwrap().comments.len(), 1);
}

#[tokio::test]
async fn test_comment_before_opening_still_fetches_the_list() {
    let mut target = post("Armada", 0, false);
    target.comments_count = 2;
    let id = target.id;
    let h = Harness::signed_in("camille", vec![target], vec![]).await;
    h.posts
        .comments
        .lock()
        .unwrap()
        .insert(id, vec![comment(id, "Super !"), comment(id, "J'arrive")]);
    h.client.feed.refresh().await.unwrap();

    h.client.feed.set_comment_draft(id, "Moi aussi").await;
    let written = h.client.feed.submit_comment(id).await.unwrap();
    h.posts.comments.lock().unwrap().get_mut(&id).unwrap().push(written);

    assert!(h.client.feed.toggle_comments(id).await.unwrap());

    assert_eq!(h.posts.script.count("comments"), 1);
    let post = h.client.feed.post(id).await.unwrap();
    assert_eq!(post.comments.len(), 3);
    assert_eq!(post.comments_count, 3);
}

#[tokio::test]
async fn test_refresh_forgets_loaded_comments() {
    let target = post("Armada", 0, false);
    let id = target.id;
    let h = Harness::signed_in("camille", vec![target], vec![]).await;
    h.posts
        .comments
        .lock()
        .unwrap()
        .insert(id, vec![comment(id, "Super !")]);
    h.client.feed.refresh().await.unwrap();
    h.client.feed.toggle_comments(id).await.unwrap();

    h.client.feed.refresh().await.unwrap();
    h.client.feed.toggle_comments(id).await.unwrap();

    assert_eq!(h.posts.script.count("comments"), 2);
}

#[tokio::test]
async fn test_edit_flow() {
    let h = Harness::signed_in("camille", vec![], vec![]).await;
    let me = h.me().await;
    let mut mine = post("Brouillon", 0, false);
    mine.user_id = Some(me.id);
    let id = mine.id;
    h.posts.feed.lock().unwrap().push(mine);
    h.client.feed.refresh().await.unwrap();

    h.client.feed.toggle_menu(id).await;
    h.client.feed.start_edit(id).await.unwrap();
    assert_eq!(h.client.feed.open_menu().await, None);
    assert_eq!(h.client.feed.editing().await.unwrap().content, "Brouillon");

    h.client.feed.set_edit_content("   ").await.unwrap();
    assert!(h.client.feed.save_edit().await.unwrap_err().is_validation());

    h.posts.script.fail_with(CityBuzzError::network("offline"));
    h.client.feed.set_edit_content("Version finale").await.unwrap();
    assert!(h.client.feed.save_edit().await.is_err());
    assert!(h.client.feed.editing().await.is_some());

    h.posts.script.succeed();
    let saved = h.client.feed.save_edit().await.unwrap();
    assert_eq!(saved.content, "Version finale");
    assert!(saved.updated_at.is_some());
    assert!(h.client.feed.editing().await.is_none());
}

#[tokio::test]
async fn test_cannot_edit_someone_elses_post() {
    let mut theirs = post("Pas à moi", 0, false);
    theirs.user_id = Some(uuid::Uuid::new_v4());
    let id = theirs.id;
    let h = Harness::signed_in("camille", vec![theirs], vec![]).await;
    h.client.feed.refresh().await.unwrap();

    assert!(h.client.feed.start_edit(id).await.unwrap_err().is_validation());
    assert!(h.client.feed.editing().await.is_none());
}

#[tokio::test]
async fn test_delete_post_requires_confirmation() {
    let h = Harness::signed_in("camille", vec![], vec![]).await;
    let me = h.me().await;
    let mut mine = post("À supprimer", 0, false);
    mine.user_id = Some(me.id);
    let id = mine.id;
    h.posts.feed.lock().unwrap().push(mine);
    h.client.feed.refresh().await.unwrap();
    h.client.feed.toggle_menu(id).await;

    assert!(!h.client.feed.delete_post(id, &FixedAnswer(false)).await.unwrap());
    assert_eq!(h.posts.script.count("delete"), 0);
    assert_eq!(h.client.feed.posts().await.len(), 1);

    h.client.feed.toggle_menu(id).await;
    assert!(h.client.feed.delete_post(id, &FixedAnswer(true)).await.unwrap());
    assert!(h.client.feed.posts().await.is_empty());
    assert_eq!(h.client.feed.open_menu().await, None);
}

#[tokio::test]
async fn test_failed_delete_leaves_post() {
    let h = Harness::signed_in("camille", vec![], vec![]).await;
    let me = h.me().await;
    let mut mine = post("À supprimer", 0, false);
    mine.user_id = Some(me.id);
    let id = mine.id;
    h.posts.feed.lock().unwrap().push(mine);
    h.client.feed.refresh().await.unwrap();
    h.posts.script.fail_with(CityBuzzError::api(500, "boom"));

    assert!(h.client.feed.delete_post(id, &FixedAnswer(true)).await.is_err());
    assert_eq!(h.client.feed.posts().await.len(), 1);
    assert_eq!(h.client.notices.active().await[0].text, "Failed to delete post");
}

#[tokio::test]
async fn test_delete_comment_decrements_counter() {
    let target = post("Armada", 0, false);
    let id = target.id;
    let h = Harness::signed_in("camille", vec![target], vec![]).await;
    h.client.feed.refresh().await.unwrap();
    h.client.feed.set_comment_draft(id, "Oups").await;
    let written = h.client.feed.submit_comment(id).await.unwrap();

    let removed = h
        .client
        .feed
        .delete_comment(id, written.id, &FixedAnswer(true))
        .await
        .unwrap();

    assert!(removed);
    let post = h.client.feed.post(id).await.unwrap();
    assert!(post.comments.is_empty());
    assert_eq!(post.comments_count, 0);
}

#[tokio::test]
async fn test_session_expiry_rechecks_and_keeps_draft() {
    let target = post("Armada", 0, false);
    let id = target.id;
    let h = Harness::signed_in("camille", vec![target], vec![]).await;
    h.client.feed.refresh().await.unwrap();
    *h.auth.current.lock().unwrap() = None;
    h.posts.script.fail_with(CityBuzzError::SessionExpired);

    h.client.feed.set_comment_draft(id, "Toujours là").await;
    let err = h.client.feed.submit_comment(id).await.unwrap_err();

    assert!(err.is_session_expired());
    assert_eq!(h.auth.probe_count(), 2);
    assert!(!h.client.session.is_authenticated().await);
    assert_eq!(h.client.feed.comment_draft(id).await, "Toujours là");
    assert_eq!(
        h.client.notices.active().await[0].text,
        "Your session has expired, please log in again"
    );
}
