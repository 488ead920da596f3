//! Checklist row on the project page

use leptos::prelude::*;

use crate::models::TodoItem;

#[component]
pub fn TodoRow(
    index: usize,
    todo: TodoItem,
    #[prop(into)] on_toggle: Callback<usize>,
) -> impl IntoView {
    let row_class = if todo.completed { "todo-row completed" } else { "todo-row" };

    view! {
        <li class=row_class>
            <label>
                <input
                    type="checkbox"
                    prop:checked=todo.completed
                    on:change=move |_| on_toggle.run(index)
                />
                <span class="todo-text">{todo.text}</span>
            </label>
        </li>
    }
}
