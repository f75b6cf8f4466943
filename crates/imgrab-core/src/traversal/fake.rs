//! Scripted in-memory browser session for traversal tests.

use super::sites::{CarouselSite, GridSite};
use crate::browser::{BrowserSession, DriverError, Key};
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// One `<img>` in a grid cell.
#[derive(Debug, Clone, Default)]
pub(crate) struct FakeImage {
    pub src: Option<String>,
    pub lazy: Option<String>,
}

impl FakeImage {
    pub fn src(src: &str) -> Self {
        Self {
            src: Some(src.to_string()),
            lazy: None,
        }
    }

    pub fn lazy(mut self, lazy: &str) -> Self {
        self.lazy = Some(lazy.to_string());
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Node {
    Body,
    LoadMore,
    FirstItem,
    Cell(usize),
    Image(usize, usize),
    Pane,
    Indicator,
    /// Viewer image; the number is the node generation it was located in.
    Viewer(u32),
}

enum Layout {
    Grid(GridSite),
    Carousel(CarouselSite),
}

pub(crate) struct FakeSession {
    layout: Layout,
    cells: Vec<Vec<FakeImage>>,
    pending_cells: Option<Vec<Vec<FakeImage>>>,
    stale_cells: HashSet<usize>,
    items: Vec<Option<String>>,
    position: usize,
    stale_items: HashSet<usize>,
    loading_polls: u32,
    viewer_generation: u32,
    clickable_after_reloads: u32,
    fail_navigation: bool,
    keys: Vec<Key>,
    reloads: u32,
    style_reads: u32,
    navigated: Arc<Mutex<Vec<String>>>,
    closed: Arc<AtomicBool>,
}

impl FakeSession {
    fn new(layout: Layout) -> Self {
        Self {
            layout,
            cells: Vec::new(),
            pending_cells: None,
            stale_cells: HashSet::new(),
            items: Vec::new(),
            position: 0,
            stale_items: HashSet::new(),
            loading_polls: 0,
            viewer_generation: 0,
            clickable_after_reloads: 0,
            fail_navigation: false,
            keys: Vec::new(),
            reloads: 0,
            style_reads: 0,
            navigated: Arc::default(),
            closed: Arc::default(),
        }
    }

    pub fn grid(site: GridSite) -> Self {
        Self::new(Layout::Grid(site))
    }

    pub fn carousel(site: CarouselSite) -> Self {
        Self::new(Layout::Carousel(site))
    }

    pub fn with_cell(mut self, images: Vec<FakeImage>) -> Self {
        self.cells.push(images);
        self
    }

    /// Cells appended when the load-more control is clicked.
    pub fn with_load_more(mut self, cells: Vec<Vec<FakeImage>>) -> Self {
        self.pending_cells = Some(cells);
        self
    }

    /// Reading cell `index` fails once with a stale reference.
    pub fn with_stale_cell(mut self, index: usize) -> Self {
        self.stale_cells.insert(index);
        self
    }

    /// Viewer items in order; the scroll offset advances with each item.
    pub fn with_items(mut self, items: Vec<Option<String>>) -> Self {
        self.items = items;
        self
    }

    pub fn with_stale_item(mut self, position: usize) -> Self {
        self.stale_items.insert(position);
        self
    }

    /// The loading indicator stays visible for this many style reads; each
    /// visible read replaces the viewer image node.
    pub fn with_loading_polls(mut self, polls: u32) -> Self {
        self.loading_polls = polls;
        self
    }

    /// The first result only becomes clickable after this many reloads.
    pub fn clickable_after_reloads(mut self, reloads: u32) -> Self {
        self.clickable_after_reloads = reloads;
        self
    }

    pub fn failing_navigation(mut self) -> Self {
        self.fail_navigation = true;
        self
    }

    pub fn keys(&self) -> Vec<Key> {
        self.keys.clone()
    }

    pub fn reloads(&self) -> u32 {
        self.reloads
    }

    pub fn style_reads(&self) -> u32 {
        self.style_reads
    }

    pub fn closed_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.closed)
    }

    pub fn navigated_log(&self) -> Arc<Mutex<Vec<String>>> {
        Arc::clone(&self.navigated)
    }

    fn missing(selector: &str) -> DriverError {
        DriverError::NoSuchElement(selector.to_string())
    }

    fn image_attr(image: &FakeImage, name: &str) -> Option<String> {
        if name == "src" {
            image.src.clone()
        } else {
            image.lazy.clone()
        }
    }

    fn check_cell(&mut self, index: usize) -> Result<(), DriverError> {
        if self.stale_cells.remove(&index) {
            return Err(DriverError::StaleElement);
        }
        Ok(())
    }
}

impl BrowserSession for FakeSession {
    type Element = Node;

    fn navigate(&mut self, url: &str) -> Result<(), DriverError> {
        if self.fail_navigation {
            return Err(DriverError::Other("net::ERR_CONNECTION_RESET".to_string()));
        }
        self.navigated.lock().unwrap().push(url.to_string());
        Ok(())
    }

    fn find_element(&mut self, selector: &str) -> Result<Node, DriverError> {
        match &self.layout {
            _ if selector == "body" => Ok(Node::Body),
            Layout::Carousel(site) if site.container == Some(selector) => Ok(Node::Pane),
            _ => Err(Self::missing(selector)),
        }
    }

    fn find_elements(&mut self, selector: &str) -> Result<Vec<Node>, DriverError> {
        match &self.layout {
            Layout::Grid(site) if site.cell == selector => {
                Ok((0..self.cells.len()).map(Node::Cell).collect())
            }
            Layout::Carousel(site) if site.container.is_none() && site.image == selector => {
                Ok(vec![Node::Viewer(self.viewer_generation)])
            }
            _ => Ok(Vec::new()),
        }
    }

    fn find_child(&mut self, parent: &Node, selector: &str) -> Result<Node, DriverError> {
        match (&self.layout, parent) {
            (Layout::Carousel(site), Node::Pane) if site.loading == Some(selector) => {
                Ok(Node::Indicator)
            }
            _ => Err(Self::missing(selector)),
        }
    }

    fn find_children(&mut self, parent: &Node, selector: &str) -> Result<Vec<Node>, DriverError> {
        let (cell_images, pane_images) = match &self.layout {
            Layout::Grid(site) => (site.image == Some(selector), false),
            Layout::Carousel(site) => (false, site.image == selector),
        };
        match *parent {
            Node::Cell(i) if cell_images => {
                self.check_cell(i)?;
                let count = self.cells.get(i).map_or(0, Vec::len);
                Ok((0..count).map(|j| Node::Image(i, j)).collect())
            }
            Node::Pane if pane_images => Ok(vec![Node::Viewer(self.viewer_generation)]),
            _ => Ok(Vec::new()),
        }
    }

    fn attribute(&mut self, element: &Node, name: &str) -> Result<Option<String>, DriverError> {
        match *element {
            Node::Cell(i) => {
                self.check_cell(i)?;
                Ok(self
                    .cells
                    .get(i)
                    .and_then(|imgs| imgs.first())
                    .and_then(|img| Self::image_attr(img, name)))
            }
            Node::Image(i, j) => Ok(self
                .cells
                .get(i)
                .and_then(|imgs| imgs.get(j))
                .and_then(|img| Self::image_attr(img, name))),
            Node::Viewer(generation) if name == "src" => {
                if generation != self.viewer_generation {
                    return Err(DriverError::StaleElement);
                }
                if self.stale_items.remove(&self.position) {
                    return Err(DriverError::StaleElement);
                }
                Ok(self.items.get(self.position).cloned().flatten())
            }
            Node::Indicator if name == "style" => {
                self.style_reads += 1;
                if self.loading_polls > 0 {
                    self.loading_polls -= 1;
                    self.viewer_generation += 1;
                    Ok(Some("display: block;".to_string()))
                } else {
                    Ok(Some("display: none;".to_string()))
                }
            }
            _ => Ok(None),
        }
    }

    fn execute_script(
        &mut self,
        function: &str,
        _target: Option<&Node>,
    ) -> Result<serde_json::Value, DriverError> {
        if function.contains("pageYOffset") {
            return Ok(serde_json::json!((self.position * 100) as f64));
        }
        Ok(serde_json::Value::Null)
    }

    fn send_key(&mut self, _element: &Node, key: Key) -> Result<(), DriverError> {
        self.keys.push(key);
        if key == Key::ArrowRight && self.position + 1 < self.items.len() {
            self.position += 1;
        }
        Ok(())
    }

    fn wait_for_clickable(&mut self, selector: &str, timeout: Duration) -> Result<Node, DriverError> {
        let timed_out = DriverError::Timeout {
            selector: selector.to_string(),
            timeout,
        };
        match &self.layout {
            Layout::Carousel(site) if site.first_item == selector => {
                if self.reloads < self.clickable_after_reloads {
                    Err(timed_out)
                } else {
                    Ok(Node::FirstItem)
                }
            }
            Layout::Grid(site) if site.load_more == Some(selector) && self.pending_cells.is_some() => {
                Ok(Node::LoadMore)
            }
            _ => Err(timed_out),
        }
    }

    fn click(&mut self, element: &Node) -> Result<(), DriverError> {
        if *element == Node::LoadMore {
            if let Some(cells) = self.pending_cells.take() {
                self.cells.extend(cells);
            }
        }
        Ok(())
    }

    fn reload(&mut self) -> Result<(), DriverError> {
        self.reloads += 1;
        Ok(())
    }

    fn close(self) -> Result<(), DriverError> {
        self.closed.store(true, Ordering::SeqCst);
        Ok(())
    }
}
