use tracing::{debug, info};

use crate::{
    error::ApiError,
    users::{Job, UserRecord, UserStore},
};

/// Replace every job whose id matches `job.id`. Returns how many matched.
pub fn replace_job(jobs: &mut [Job], job: &Job) -> usize {
    let mut replaced = 0;
    for slot in jobs.iter_mut().filter(|j| j.id == job.id) {
        *slot = job.clone();
        replaced += 1;
    }
    replaced
}

/// Drop every job with `job_id`. Returns how many were removed.
pub fn remove_job(jobs: &mut Vec<Job>, job_id: &str) -> usize {
    let before = jobs.len();
    jobs.retain(|j| j.id != job_id);
    before - jobs.len()
}

async fn load_user(store: &dyn UserStore, email: &str) -> Result<UserRecord, ApiError> {
    store
        .find_by_email(email)
        .await?
        .ok_or(ApiError::UserNotFound)
}

/// Append `job`. Duplicate ids are allowed.
pub async fn add_job(store: &dyn UserStore, email: &str, job: Job) -> Result<(), ApiError> {
    let mut user = load_user(store, email).await?;
    let id = job.id.clone();
    user.jobs_mut().push(job);
    let saved = store.save_jobs(&user).await?;
    info!(%email, job_id = %id, total = saved.jobs().len(), "job added");
    Ok(())
}

pub async fn list_jobs(store: &dyn UserStore, email: &str) -> Result<Vec<Job>, ApiError> {
    let user = load_user(store, email).await?;
    Ok(user.jobs.0)
}

/// Replace matching jobs in place. No match is not an error.
pub async fn update_job(store: &dyn UserStore, email: &str, job: Job) -> Result<(), ApiError> {
    let mut user = load_user(store, email).await?;
    let replaced = replace_job(user.jobs_mut(), &job);
    store.save_jobs(&user).await?;
    debug!(%email, job_id = %job.id, replaced, "job updated");
    Ok(())
}

/// Remove matching jobs. No match is not an error.
pub async fn delete_job(store: &dyn UserStore, email: &str, job_id: &str) -> Result<(), ApiError> {
    let mut user = load_user(store, email).await?;
    let removed = remove_job(user.jobs_mut(), job_id);
    store.save_jobs(&user).await?;
    debug!(%email, %job_id, removed, "job deleted");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::users::memory::InMemoryUserStore;
    use serde_json::json;

    fn job(value: serde_json::Value) -> Job {
        serde_json::from_value(value).unwrap()
    }

    async fn store_with_user(email: &str) -> InMemoryUserStore {
        let store = InMemoryUserStore::new();
        store.create(email, "hash").await.unwrap();
        store
    }

    #[test]
    fn replace_hits_every_match_and_keeps_order() {
        let mut jobs = vec![
            job(json!({"id": "1", "title": "a"})),
            job(json!({"id": "2", "title": "b"})),
            job(json!({"id": "1", "title": "c"})),
        ];
        let n = replace_job(&mut jobs, &job(json!({"id": "1", "title": "z"})));
        assert_eq!(n, 2);
        let titles: Vec<_> = jobs.iter().map(|j| j.fields["title"].clone()).collect();
        assert_eq!(titles, vec![json!("z"), json!("b"), json!("z")]);
    }

    #[test]
    fn replace_swaps_whole_record() {
        let mut jobs = vec![job(json!({"id": "1", "title": "a", "company": "acme"}))];
        replace_job(&mut jobs, &job(json!({"id": "1", "title": "b"})));
        assert!(!jobs[0].fields.contains_key("company"));
    }

    #[test]
    fn remove_drops_all_matches() {
        let mut jobs = vec![
            job(json!({"id": "1"})),
            job(json!({"id": "2"})),
            job(json!({"id": "1"})),
        ];
        assert_eq!(remove_job(&mut jobs, "1"), 2);
        assert_eq!(jobs.len(), 1);
        assert_eq!(remove_job(&mut jobs, "1"), 0);
    }

    #[tokio::test]
    async fn add_then_list() {
        let store = store_with_user("a@b.com").await;
        add_job(&store, "a@b.com", job(json!({"id": "1", "title": "x"})))
            .await
            .unwrap();

        let jobs = list_jobs(&store, "a@b.com").await.unwrap();
        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].id, "1");
        assert_eq!(jobs[0].fields["title"], "x");
    }

    #[tokio::test]
    async fn add_allows_duplicate_ids() {
        let store = store_with_user("a@b.com").await;
        for _ in 0..2 {
            add_job(&store, "a@b.com", job(json!({"id": "1"}))).await.unwrap();
        }
        assert_eq!(list_jobs(&store, "a@b.com").await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn update_of_missing_job_is_a_noop() {
        let store = store_with_user("a@b.com").await;
        add_job(&store, "a@b.com", job(json!({"id": "1", "title": "x"})))
            .await
            .unwrap();
        let before = list_jobs(&store, "a@b.com").await.unwrap();

        update_job(&store, "a@b.com", job(json!({"id": "missing", "title": "y"})))
            .await
            .unwrap();
        assert_eq!(list_jobs(&store, "a@b.com").await.unwrap(), before);
    }

    #[tokio::test]
    async fn delete_twice_succeeds() {
        let store = store_with_user("a@b.com").await;
        add_job(&store, "a@b.com", job(json!({"id": "1"}))).await.unwrap();
        add_job(&store, "a@b.com", job(json!({"id": "2"}))).await.unwrap();

        delete_job(&store, "a@b.com", "1").await.unwrap();
        delete_job(&store, "a@b.com", "1").await.unwrap();

        let jobs = list_jobs(&store, "a@b.com").await.unwrap();
        assert!(jobs.iter().all(|j| j.id != "1"));
        assert_eq!(jobs.len(), 1);
    }

    #[tokio::test]
    async fn unknown_user_is_user_not_found() {
        let store = InMemoryUserStore::new();
        let j = job(json!({"id": "1"}));
        assert!(matches!(
            add_job(&store, "x@y.com", j.clone()).await,
            Err(ApiError::UserNotFound)
        ));
        assert!(matches!(list_jobs(&store, "x@y.com").await, Err(ApiError::UserNotFound)));
        assert!(matches!(
            update_job(&store, "x@y.com", j).await,
            Err(ApiError::UserNotFound)
        ));
        assert!(matches!(
            delete_job(&store, "x@y.com", "1").await,
            Err(ApiError::UserNotFound)
        ));
    }
}
