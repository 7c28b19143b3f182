use crate::page::Page;
use crate::page_state::PageState;

/// Every page's state, built once and indexed by [`Page`].
#[derive(Clone, Debug)]
pub struct PageRegistry {
    states: [PageState; 6],
}

impl PageRegistry {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            states: Page::ALL.map(|page| PageState::new(page, width, height)),
        }
    }

    pub fn get(&self, page: Page) -> &PageState {
        &self.states[page.index()]
    }

    pub fn get_mut(&mut self, page: Page) -> &mut PageState {
        &mut self.states[page.index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = &PageState> {
        self.states.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut PageState> {
        self.states.iter_mut()
    }
}
