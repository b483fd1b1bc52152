//! End-to-end tests: markup in, mounted app, mutations, rendered markup out.

use std::cell::Cell;
use std::rc::Rc;

use pretty_assertions::assert_eq;
use rivulet::{App, Error, Value, DATA_TOPIC};

#[test]
fn mount_renders_the_initial_state() {
    let app = App::mount(
        r#"<div><h1>{{title}}</h1><p>hello, {{user.name}}!</p></div>"#,
        Value::object([
            ("title", Value::from("rivulet")),
            ("user", Value::object([("name", Value::from("ada"))])),
        ]),
    )
    .unwrap();
    insta::assert_snapshot!(
        app.render(),
        @"<div><h1>rivulet</h1><p>hello, ada!</p></div>"
    );
}

#[test]
fn store_mutation_rerenders_before_set_returns() {
    let app = App::mount(
        "<p>{{count}} items</p>",
        Value::object([("count", Value::Int(1))]),
    )
    .unwrap();
    assert_eq!(app.render(), "<p>1 items</p>");

    app.store().set("count", Value::Int(4)).unwrap();
    assert_eq!(app.render(), "<p>4 items</p>");
}

#[test]
fn nested_path_mutation_rerenders() {
    let app = App::mount(
        "<p>{{user.address.city}}</p>",
        Value::object([(
            "user",
            Value::object([(
                "address",
                Value::object([("city", Value::from("london"))]),
            )]),
        )]),
    )
    .unwrap();
    app.store()
        .set("user.address.city", Value::from("paris"))
        .unwrap();
    assert_eq!(app.render(), "<p>paris</p>");
}

#[test]
fn repeat_over_range_builtin() {
    let app = App::mount(
        r#"<ul for-expr="range(0, 3)"><li>{{it}}</li></ul>"#,
        Value::object([] as [(&str, Value); 0]),
    )
    .unwrap();
    insta::assert_snapshot!(app.render(), @"<ul><li>0</li><li>1</li><li>2</li></ul>");
}

#[test]
fn repeat_tracks_a_store_backed_generator() {
    let app = App::mount(
        r#"<ul for-expr="names" for-var="who"><li>{{who}}</li></ul>"#,
        Value::object([(
            "names",
            Value::list([Value::from("ada"), Value::from("bo")]),
        )]),
    )
    .unwrap();
    assert_eq!(app.render(), "<ul><li>ada</li><li>bo</li></ul>");

    app.store()
        .set("names", Value::list([Value::from("ada")]))
        .unwrap();
    assert_eq!(app.render(), "<ul><li>ada</li></ul>");

    app.store()
        .set(
            "names",
            Value::list([Value::from("x"), Value::from("y"), Value::from("z")]),
        )
        .unwrap();
    assert_eq!(app.render(), "<ul><li>x</li><li>y</li><li>z</li></ul>");
}

#[test]
fn conditional_toggles_with_a_fresh_clone_each_time() {
    let app = App::mount(
        r#"<div><p if-expr="open">{{label}}</p></div>"#,
        Value::object([("open", Value::Bool(true)), ("label", Value::from("a"))]),
    )
    .unwrap();
    assert_eq!(app.render(), "<div><p>a</p></div>");

    app.store().set("open", Value::Bool(false)).unwrap();
    assert_eq!(app.render(), "<div><p></p></div>");

    app.store().set("label", Value::from("b")).unwrap();
    app.store().set("open", Value::Bool(true)).unwrap();
    assert_eq!(app.render(), "<div><p>b</p></div>");
}

#[test]
fn repeat_scope_shadows_the_store() {
    let app = App::mount(
        r#"<div><p>{{x}}</p><ul for-expr="range(10, 12)" for-var="x"><li>{{x}}</li></ul></div>"#,
        Value::object([("x", Value::Int(1))]),
    )
    .unwrap();
    insta::assert_snapshot!(
        app.render(),
        @"<div><p>1</p><ul><li>10</li><li>11</li></ul></div>"
    );
}

#[test]
fn conditional_inside_repeat_filters_items() {
    let app = App::mount(
        r#"<ul for-expr="range(0, 4)"><li if-expr="it / 2 * 2 == it">{{it}}</li></ul>"#,
        Value::object([] as [(&str, Value); 0]),
    )
    .unwrap();
    // Integer division keeps even items only.
    assert_eq!(
        app.render(),
        "<ul><li>0</li><li></li><li>2</li><li></li></ul>"
    );
}

#[test]
fn refresh_is_idempotent() {
    let app = App::mount(
        r#"<div><ul for-expr="range(0, n)"><li>{{it}}</li></ul><p if-expr="n > 1">many</p></div>"#,
        Value::object([("n", Value::Int(3))]),
    )
    .unwrap();
    let first = app.render();
    app.refresh().unwrap();
    app.refresh().unwrap();
    assert_eq!(app.render(), first);
}

#[test]
fn unbound_placeholder_fails_the_mount() {
    let err = match App::mount(
        "<p>{{missing}}</p>",
        Value::object([("present", Value::Int(1))]),
    ) {
        Ok(_) => panic!("mount with an unbound placeholder must fail"),
        Err(err) => err,
    };
    assert!(matches!(err, Error::UnboundName { .. }));
}

#[test]
fn click_action_mutates_and_rerenders() {
    let app = App::mount(
        r#"<div><p>count: {{count}}</p><button click-expr="count = count + 1">+</button></div>"#,
        Value::object([("count", Value::Int(0))]),
    )
    .unwrap();
    let button = app.dom().borrow().query_by_tag("button")[0];

    app.trigger(button).unwrap();
    assert_eq!(app.render(), "<div><p>count: 1</p><button>+</button></div>");
    app.trigger(button).unwrap();
    assert_eq!(app.render(), "<div><p>count: 2</p><button>+</button></div>");
}

#[test]
fn click_action_inside_repeat_sees_the_item_scope() {
    let app = App::mount(
        r#"<div><p>{{picked}}</p><ul for-expr="range(0, 3)"><li click-expr="picked = it">{{it}}</li></ul></div>"#,
        Value::object([("picked", Value::Int(-1))]),
    )
    .unwrap();
    let items = {
        let dom = app.dom();
        let dom = dom.borrow();
        let ul = dom.query_by_tag("ul")[0];
        dom.children(ul).to_vec()
    };
    assert_eq!(items.len(), 3);

    app.trigger(items[2]).unwrap();
    // The write rebuilt the list, so re-query before asserting.
    assert_eq!(app.store().get("picked").unwrap(), Value::Int(2));
    assert!(app.render().starts_with("<div><p>2</p>"));
}

#[test]
fn stale_action_is_gone_after_its_region_rebuilds() {
    let app = App::mount(
        r#"<div><ul for-expr="range(0, 1)"><li click-expr="n = it">x</li></ul><p>{{n}}</p></div>"#,
        Value::object([("n", Value::Int(9))]),
    )
    .unwrap();
    let old_li = app.dom().borrow().query_by_tag("li")[0];

    // Any observed write rebuilds the repeat region and destroys old_li.
    app.store().set("n", Value::Int(8)).unwrap();
    assert!(app.trigger(old_li).is_err());

    let fresh_li = app.dom().borrow().query_by_tag("li")[0];
    app.trigger(fresh_li).unwrap();
    assert_eq!(app.store().get("n").unwrap(), Value::Int(0));
}

#[test]
fn publish_from_a_click_action_reaches_subscribers() {
    let app = App::mount(
        r#"<button click-expr="publish('saved', 1)">save</button>"#,
        Value::object([] as [(&str, Value); 0]),
    )
    .unwrap();
    let hits = Rc::new(Cell::new(0));
    let hits_c = hits.clone();
    app.subscribe("saved", move |_| hits_c.set(hits_c.get() + 1));

    let button = app.dom().borrow().query_by_tag("button")[0];
    app.trigger(button).unwrap();
    assert_eq!(hits.get(), 1);
}

#[test]
fn listener_writing_back_triggers_a_nested_refresh() {
    let app = App::mount(
        "<div><p>{{a}}</p><p>{{b}}</p></div>",
        Value::object([("a", Value::Int(0)), ("b", Value::Int(0))]),
    )
    .unwrap();

    // A data listener that derives `b` from `a`, once per external write.
    let armed = Rc::new(Cell::new(true));
    let armed_c = armed.clone();
    let store = app.store().clone();
    app.subscribe(DATA_TOPIC, move |_| {
        if armed_c.replace(false) {
            store.set("b", Value::Int(10)).unwrap();
        }
    });

    app.store().set("a", Value::Int(5)).unwrap();
    assert_eq!(app.render(), "<div><p>5</p><p>10</p></div>");
}

#[test]
fn evaluate_runs_under_the_store_scope() {
    let app = App::mount(
        "<p>x</p>",
        Value::object([("price", Value::Int(4)), ("qty", Value::Int(3))]),
    )
    .unwrap();
    assert_eq!(app.evaluate("price * qty", []).unwrap(), Value::Int(12));
    assert_eq!(
        app.evaluate("price * qty", [("qty".to_owned(), Value::Int(10))])
            .unwrap(),
        Value::Int(40)
    );
}
