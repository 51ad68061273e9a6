//! Memory Quest entry point
//!
//! Handles platform-specific initialization and drives the session.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;
    use wasm_bindgen::prelude::*;
    use web_sys::{Document, Element, MouseEvent};

    use memory_quest::assets::FALLBACK_IMAGE;
    use memory_quest::persistence::{KeyValueStore, LocalStore, MemoryStore};
    use memory_quest::{BoardView, Session, Settings};

    type Game = Session<Box<dyn KeyValueStore>>;

    /// Card elements, one per board position
    #[derive(Default)]
    struct Board {
        slots: Vec<Element>,
        images: Vec<Element>,
    }

    /// Open LocalStorage, or keep the game in memory if it is unavailable
    fn open_storage() -> Box<dyn KeyValueStore> {
        match LocalStore::open() {
            Ok(store) => Box::new(store),
            Err(e) => {
                log::warn!("{} - progress will not survive a reload", e);
                Box::new(MemoryStore::new())
            }
        }
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");

        log::info!("Memory Quest starting...");

        let mut storage = open_storage();
        let settings = Settings::load(&storage);
        // Write back so a missing or partial entry lists every field
        settings.save(&mut storage);

        let seed = js_sys::Date::now() as u64;
        let game = Rc::new(RefCell::new(Session::start(storage, &settings, seed)));
        let board = Rc::new(RefCell::new(Board::default()));

        setup_new_game_buttons(game.clone(), board.clone());

        let view = game.borrow().view();
        redraw(&game, &board, &view);
        request_animation_frame(game, board);

        log::info!("Memory Quest running!");
    }

    /// Replace every card element, one slot per card in `len`
    fn rebuild_board(
        document: &Document,
        game: &Rc<RefCell<Game>>,
        board: &Rc<RefCell<Board>>,
        len: usize,
    ) {
        let Some(container) = document.get_element_by_id("board") else {
            log::error!("No #board element");
            return;
        };
        container.set_inner_html("");

        let mut slots = Vec::with_capacity(len);
        let mut images = Vec::with_capacity(len);
        for index in 0..len {
            let (Ok(slot), Ok(image)) = (
                document.create_element("div"),
                document.create_element("img"),
            ) else {
                log::error!("Failed to create card element");
                return;
            };
            let _ = image.set_attribute(
                "onerror",
                &format!("this.onerror=null;this.src='{}'", FALLBACK_IMAGE),
            );
            let _ = slot.append_child(&image);
            let _ = container.append_child(&slot);
            setup_card_handler(&slot, index, game.clone(), board.clone());
            slots.push(slot);
            images.push(image);
        }

        log::debug!("Board built with {} cards", len);
        *board.borrow_mut() = Board { slots, images };
    }

    fn render(document: &Document, board: &Board, view: &BoardView) {
        for ((slot, image), card) in board.slots.iter().zip(&board.images).zip(&view.cards) {
            let mut class = String::from("card");
            if card.flipped {
                class.push_str(" flipped");
            }
            if card.matched {
                class.push_str(" matched");
            }
            if card.disabled {
                class.push_str(" disabled");
            }
            let _ = slot.set_attribute("class", &class);
            let _ = image.set_attribute("src", &card.image_ref);
            let _ = image.set_attribute("alt", &card.face_key);
        }

        if let Some(el) = document.get_element_by_id("turns") {
            el.set_text_content(Some(&view.turns.to_string()));
        }
        if let Some(btn) = document.get_element_by_id("new-game-btn") {
            if view.new_game_disabled {
                let _ = btn.set_attribute("disabled", "");
            } else {
                let _ = btn.remove_attribute("disabled");
            }
        }
        if let Some(el) = document.get_element_by_id("win-banner") {
            if view.is_won {
                let _ = el.set_attribute("class", "");
                if let Some(turns) = document.get_element_by_id("win-turns") {
                    turns.set_text_content(Some(&view.turns.to_string()));
                }
            } else {
                let _ = el.set_attribute("class", "hidden");
            }
        }
    }

    /// Draw `view`, resizing the board first if the deck size changed
    fn redraw(game: &Rc<RefCell<Game>>, board: &Rc<RefCell<Board>>, view: &BoardView) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };
        if board.borrow().slots.len() != view.cards.len() {
            rebuild_board(&document, game, board, view.cards.len());
        }
        render(&document, &board.borrow(), view);
    }

    fn setup_card_handler(
        slot: &Element,
        index: usize,
        game: Rc<RefCell<Game>>,
        board: Rc<RefCell<Board>>,
    ) {
        let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
            let view = {
                let mut g = game.borrow_mut();
                // Positions are fixed; the card under a position changes per deal
                let Some(id) = g.view().cards.get(index).map(|c| c.id) else {
                    return;
                };
                g.select(id, js_sys::Date::now());
                g.view()
            };
            redraw(&game, &board, &view);
        });
        let _ = slot.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn setup_new_game_buttons(game: Rc<RefCell<Game>>, board: Rc<RefCell<Board>>) {
        let Some(document) = web_sys::window().and_then(|w| w.document()) else {
            return;
        };
        for id in ["new-game-btn", "play-again-btn"] {
            let Some(btn) = document.get_element_by_id(id) else {
                continue;
            };
            let game = game.clone();
            let board = board.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                let view = {
                    let mut g = game.borrow_mut();
                    if g.view().new_game_disabled {
                        return;
                    }
                    g.new_game(js_sys::Date::now());
                    g.view()
                };
                redraw(&game, &board, &view);
            });
            let _ = btn.add_event_listener_with_callback("click", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }

    fn request_animation_frame(game: Rc<RefCell<Game>>, board: Rc<RefCell<Board>>) {
        let Some(window) = web_sys::window() else {
            return;
        };
        let closure = Closure::once(move |_time: f64| {
            game_loop(game, board);
        });
        let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        closure.forget();
    }

    fn game_loop(game: Rc<RefCell<Game>>, board: Rc<RefCell<Board>>) {
        let fired = {
            let mut g = game.borrow_mut();
            if g.has_pending_reset() {
                g.update(js_sys::Date::now());
                Some(g.view())
            } else {
                None
            }
        };
        if let Some(view) = fired {
            redraw(&game, &board, &view);
        }

        request_animation_frame(game, board);
    }
}

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() {
    wasm_game::run();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use memory_quest::persistence::MemoryStore;
    use memory_quest::{Session, Settings};

    env_logger::init();
    log::info!("Memory Quest (native) starting...");
    log::info!("Run with `trunk serve` for the web version; playing a demo game");

    let storage = MemoryStore::new();
    let settings = Settings::load(&storage);
    let mut session = Session::start(storage, &settings, rand::random());

    let turns = autoplay(&mut session, settings.mismatch_delay_ms);
    println!("\nSolved in {} turns", turns);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}

/// Play a game to completion, remembering every face that has been revealed
#[cfg(not(target_arch = "wasm32"))]
fn autoplay(
    session: &mut memory_quest::Session<memory_quest::persistence::MemoryStore>,
    delay_ms: u32,
) -> u32 {
    use std::collections::HashMap;

    use memory_quest::{BoardView, CardView};

    fn next_choice(
        view: &BoardView,
        seen: &HashMap<u32, String>,
        first: Option<&CardView>,
    ) -> Option<u32> {
        let open = view
            .cards
            .iter()
            .filter(|c| !c.matched && Some(c.id) != first.map(|f| f.id));
        let unseen = open.clone().find(|c| !seen.contains_key(&c.id));

        let known = match first {
            Some(first) => open
                .clone()
                .find(|c| seen.get(&c.id) == Some(&first.face_key)),
            None => open.clone().find(|a| {
                seen.contains_key(&a.id)
                    && open
                        .clone()
                        .any(|b| b.id != a.id && seen.get(&b.id) == seen.get(&a.id))
            }),
        };

        known.or(unseen).or_else(|| open.clone().next()).map(|c| c.id)
    }

    let mut seen: HashMap<u32, String> = HashMap::new();
    let mut now = 0.0;

    while !session.view().is_won {
        for _ in 0..2 {
            let view = session.view();
            let first = view.cards.iter().find(|c| c.flipped && !c.matched);
            let Some(id) = next_choice(&view, &seen, first) else {
                return session.view().turns;
            };
            session.select(id, now);
            if let Some(card) = session.view().cards.iter().find(|c| c.id == id) {
                seen.insert(id, card.face_key.clone());
            }
        }

        now += f64::from(delay_ms);
        session.update(now);
        log::debug!("Turn {} done", session.view().turns);
    }

    session.view().turns
}
