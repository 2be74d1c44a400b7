use std::time::Duration;

use api::{Backend, InMemoryBackend, Session};
use course_core::demo::DEMO_COURSE_COUNT;
use course_core::model::{CourseAccess, CourseId, LessonId, Viewer};
use course_core::time::fixed_clock;
use services::{AppServices, CatalogNotice, CatalogService, SubscriptionService};

#[tokio::test]
async fn fresh_backend_walks_from_catalog_to_subscription() {
    let memory = InMemoryBackend::new();
    let session = Session::in_memory();
    let backend = Backend::from_memory(memory.clone());
    let services = AppServices::from_backend(backend.clone(), session.clone(), fixed_clock())
        .with_subscriptions(
            SubscriptionService::new(fixed_clock(), backend.account.clone(), session.clone())
                .with_processing_delay(Duration::ZERO),
        );

    let catalog = services.catalog().load_catalog().await;
    assert_eq!(catalog.courses.len(), DEMO_COURSE_COUNT);
    assert_eq!(catalog.notice, Some(CatalogNotice::Empty));

    let premium = catalog
        .courses
        .iter()
        .find(|course| course.is_premium())
        .expect("demo catalog has a premium course");
    assert_eq!(
        CatalogService::access_for(premium, Viewer::anonymous()),
        CourseAccess::RequiresSubscription
    );

    let course = services.courses().load_course(CourseId::new(1)).await.unwrap();
    assert!(course.notice.is_some());
    assert_eq!(course.completion_percent, 0);

    let auth = services.auth();
    auth.signup("Ada", "ada@example.com", "secret1").await.unwrap();
    assert!(services.session().is_signed_in());

    let receipt = services.subscriptions().purchase("monthly").await.unwrap();
    assert_eq!(receipt.plan.id, "monthly");
    assert!(auth.current_user().await.unwrap().unwrap().is_subscriber);

    let lesson = services.lessons().load_lesson(LessonId::new(102)).await.unwrap();
    assert_eq!(lesson.lesson.course_id, CourseId::new(1));

    auth.logout();
    assert!(!session.is_signed_in());
    assert_eq!(memory.subscribed_plan().as_deref(), Some("monthly"));
}
