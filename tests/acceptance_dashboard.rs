mod common;

use common::FakeServer;
use tempfile::tempdir;
use todo_dashboard::application::dashboard::{Dashboard, Request};
use todo_dashboard::application::dispatcher::Dispatcher;
use todo_dashboard::application::session::Session;
use todo_dashboard::domain::storage::{TokenStore, ACCESS_TOKEN_KEY};
use todo_dashboard::domain::todo::{DoneFilter, Priority, PriorityFilter};
use todo_dashboard::infrastructure::{file_store::FileStore, http_api::HttpTodoApi};

#[tokio::test]
async fn acceptance_login_create_toggle_filter_delete_logout() {
    let server = FakeServer::start().await;
    let dir = tempdir().unwrap();
    let storage = dir.path().join("local_storage.json");
    let dispatcher = Dispatcher::new(HttpTodoApi::new(&server.base_url).unwrap());

    let mut dash = Dashboard::new(Session::restore(FileStore::open(&storage).unwrap()));
    assert!(dash.start().is_none());

    // register + login
    dash.set_username("kim");
    dash.set_password("pw");
    let req = dash.submit_register();
    dispatcher.settle(&mut dash, req).await;
    let req = dash.submit_login();
    dispatcher.settle(&mut dash, req).await;
    assert_eq!(dash.session().token(), Some("token-kim"));
    assert_eq!(FileStore::open(&storage).unwrap().get(ACCESS_TOKEN_KEY).unwrap().as_deref(), Some("token-kim"));
    assert_eq!(server.last_request().authorization.as_deref(), Some("Bearer token-kim"));

    // create two tasks
    for (title, priority) in [("Buy milk", Priority::High), ("Read book", Priority::Low)] {
        dash.edit_draft(|d| { d.title = title.into(); d.priority = priority; });
        let req = dash.submit_create();
        dispatcher.settle(&mut dash, req).await;
    }
    let titles: Vec<_> = dash.todos().iter().map(|t| t.title.as_str()).collect();
    assert_eq!(titles, ["Read book", "Buy milk"]);

    // toggle
    let milk = dash.todos()[1].id;
    let req = dash.toggle(milk);
    dispatcher.settle(&mut dash, req).await;
    assert!(dash.todos()[1].done);

    // filters
    let req = dash.set_done_filter(DoneFilter::Done);
    dispatcher.settle(&mut dash, req).await;
    assert_eq!(server.last_request().query.as_deref(), Some("done=true"));
    assert_eq!(dash.todos().len(), 1);
    assert_eq!(dash.todos()[0].title, "Buy milk");

    let req = dash.set_done_filter(DoneFilter::All);
    dispatcher.settle(&mut dash, req).await;
    let req = dash.set_priority_filter(PriorityFilter::Only(Priority::Low));
    dispatcher.settle(&mut dash, req).await;
    assert_eq!(server.last_request().query.as_deref(), Some("priority=low"));
    assert_eq!(dash.todos().len(), 1);
    assert_eq!(dash.todos()[0].title, "Read book");

    // delete
    let book = dash.todos()[0].id;
    let req = dash.delete(book);
    dispatcher.settle(&mut dash, req).await;
    assert!(dash.todos().is_empty());
    assert!(dash.todo_message().is_none());

    // logout
    dash.logout();
    assert!(!dash.is_authenticated());
    assert!(dash.todos().is_empty());
    assert_eq!(FileStore::open(&storage).unwrap().get(ACCESS_TOKEN_KEY).unwrap(), None);
}

#[tokio::test]
async fn acceptance_restored_session_lists_on_start() {
    let server = FakeServer::start().await;
    let dir = tempdir().unwrap();
    let storage = dir.path().join("local_storage.json");
    let dispatcher = Dispatcher::new(HttpTodoApi::new(&server.base_url).unwrap());

    {
        let mut dash = Dashboard::new(Session::restore(FileStore::open(&storage).unwrap()));
        dash.set_username("kim");
        dash.set_password("pw");
        let req = dash.submit_register();
        dispatcher.settle(&mut dash, req).await;
        let req = dash.submit_login();
        dispatcher.settle(&mut dash, req).await;
        dash.edit_draft(|d| d.title = "Carry over".into());
        let req = dash.submit_create();
        dispatcher.settle(&mut dash, req).await;
    }

    let mut dash = Dashboard::new(Session::restore(FileStore::open(&storage).unwrap()));
    let req = dash.start();
    assert!(matches!(req, Some(Request::FetchTodos { .. })));
    dispatcher.settle(&mut dash, req).await;
    assert_eq!(dash.todos().len(), 1);
    assert_eq!(dash.todos()[0].title, "Carry over");
}

#[tokio::test]
async fn acceptance_server_rejection_surfaces_message() {
    let server = FakeServer::start().await;
    let dir = tempdir().unwrap();
    let dispatcher = Dispatcher::new(HttpTodoApi::new(&server.base_url).unwrap());
    let mut dash = Dashboard::new(Session::restore(FileStore::open(dir.path().join("s.json")).unwrap()));

    dash.set_username("kim");
    dash.set_password("pw");
    let req = dash.submit_login();
    dispatcher.settle(&mut dash, req).await;
    assert!(!dash.is_authenticated());
    assert_eq!(dash.auth_message(), Some("invalid credentials"));
}
