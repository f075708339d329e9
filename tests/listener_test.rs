use std::{cell::RefCell, rc::Rc};

use scppr::{
    ButtonInput, ElementState, KeyCode, Listener, ListenerKind, ModifiersState, MouseButton,
    PhysicalKey, listener::Listeners,
};

#[test]
fn scroll_offset_is_forwarded_exactly() {
    let received = Rc::new(RefCell::new(Vec::new()));
    let mut listeners = Listeners::new();
    {
        let received = received.clone();
        listeners.add(Listener::scroll(move |dx, dy| received.borrow_mut().push((dx, dy))));
    }

    listeners.on_scroll(0.0, -2.5);
    assert_eq!(*received.borrow(), vec![(0.0, -2.5)]);

    listeners.remove(ListenerKind::Scroll);
    listeners.on_scroll(1.0, 1.0);
    assert_eq!(received.borrow().len(), 1);
}

#[test]
fn registering_again_replaces_the_callback() {
    let calls = Rc::new(RefCell::new(Vec::new()));
    let mut listeners = Listeners::new();
    for tag in ["first", "second"] {
        let calls = calls.clone();
        listeners.add(Listener::pointer_move(move |x, y| {
            calls.borrow_mut().push((tag, x, y))
        }));
    }

    listeners.on_pointer_move(3.0, 4.0);
    assert_eq!(*calls.borrow(), vec![("second", 3.0, 4.0)]);
}

#[test]
fn add_returns_the_replaced_listener() {
    let mut listeners = Listeners::new();
    assert!(listeners.add(Listener::key(|_| {})).is_none());
    let replaced = listeners.add(Listener::key(|_| {}));
    assert_eq!(replaced.map(|l| l.kind()), Some(ListenerKind::Key));
}

#[test]
fn dispatch_without_a_listener_does_nothing() {
    let mut listeners = Listeners::new();
    listeners.on_scroll(1.0, 1.0);
    listeners.on_pointer_move(1.0, 1.0);
    listeners.on_button(ButtonInput {
        button: MouseButton::Left,
        state: ElementState::Pressed,
        modifiers: ModifiersState::empty(),
    });
    assert!(listeners.remove(ListenerKind::Button).is_none());
}

#[test]
fn kinds_are_independent() {
    let buttons = Rc::new(RefCell::new(Vec::new()));
    let mut listeners = Listeners::new();
    {
        let buttons = buttons.clone();
        listeners.add(Listener::button(move |input| buttons.borrow_mut().push(input)));
    }
    listeners.add(Listener::key(|_| panic!("no key events were sent")));
    listeners.remove(ListenerKind::Key);

    let input = ButtonInput {
        button: MouseButton::Right,
        state: ElementState::Released,
        modifiers: ModifiersState::SHIFT,
    };
    listeners.on_button(input);
    listeners.on_key(scppr::KeyInput {
        key: PhysicalKey::Code(KeyCode::KeyW),
        state: ElementState::Pressed,
        repeat: false,
        modifiers: ModifiersState::empty(),
    });

    assert_eq!(*buttons.borrow(), vec![input]);
    assert!(listeners.contains(ListenerKind::Button));
    assert!(!listeners.contains(ListenerKind::Key));
    assert!(!listeners.contains(ListenerKind::Scroll));
}
