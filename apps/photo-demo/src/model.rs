//! Gallery model and its mapping onto the layout tree.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use vscroll_layout::{KnuthPlassLayout, LayoutError, LayoutTree, ListLayout, NodeId, Sizing, ViewType};

pub const GROUP_COUNT: usize = 100;
pub const GROUP_SIZE: usize = 50;

pub const HEADER_VIEW: ViewType = ViewType::new("group-header");
pub const PHOTO_VIEW: ViewType = ViewType::new("photo");
pub const PLACEHOLDER_VIEW: ViewType = ViewType::new("placeholder");

/// Estimated extent of a group that has not been loaded yet.
const LAZY_HEIGHT: f32 = 500.0;
const HEADER_HEIGHT: f32 = 50.0;
const GALLERY_MARGIN: f32 = 2.0;
const ROW_SIZE: f32 = 120.0;

#[derive(Clone, Debug)]
pub struct Photo {
    pub id: usize,
    pub text: String,
    pub aspect_ratio: f32,
}

#[derive(Clone, Debug)]
pub struct Group {
    pub id: usize,
    pub photos: Vec<Photo>,
}

/// Payload of every node in the gallery tree.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Entry {
    Gallery,
    Group(usize),
    Header(usize),
    Photos(usize),
    Photo(usize),
}

pub struct Model {
    pub groups: Vec<Group>,
}

impl Model {
    /// Builds a reproducible gallery with aspect ratios in `[1, 2)`.
    pub fn generate(seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let groups = (0..GROUP_COUNT)
            .map(|group| Group {
                id: group,
                photos: (group * GROUP_SIZE..(group + 1) * GROUP_SIZE)
                    .map(|id| Photo {
                        id,
                        text: format!("Photo {id}"),
                        aspect_ratio: rng.gen_range(1.0..2.0),
                    })
                    .collect(),
            })
            .collect();
        Self { groups }
    }

    pub fn photo_count(&self) -> usize {
        self.groups.iter().map(|group| group.photos.len()).sum()
    }

    /// Creates the gallery list with one lazy placeholder per group.
    pub fn build_tree(&self, tree: &mut LayoutTree<Entry>) -> Result<NodeId, LayoutError> {
        let gallery = tree.new_container(Entry::Gallery, ListLayout::vertical(GALLERY_MARGIN));
        for group in &self.groups {
            let placeholder =
                tree.new_placeholder(Entry::Group(group.id), Sizing::fixed_height(LAZY_HEIGHT));
            tree.set_view_type(placeholder, PLACEHOLDER_VIEW)?;
            tree.append(gallery, placeholder)?;
        }
        Ok(gallery)
    }

    /// Creates the detached header and photo block of a loaded group.
    pub fn build_group(
        &self,
        tree: &mut LayoutTree<Entry>,
        group: usize,
    ) -> Result<[NodeId; 2], LayoutError> {
        let header = tree.new_sticky(Entry::Header(group));
        tree.set_sizing(header, Sizing::fixed_height(HEADER_HEIGHT))?;
        tree.set_view_type(header, HEADER_VIEW)?;

        let block = tree.new_container(
            Entry::Photos(group),
            KnuthPlassLayout::vertical(ROW_SIZE, GALLERY_MARGIN),
        );
        if let Some(group) = self.groups.get(group) {
            for photo in &group.photos {
                let item = tree.new_item(Entry::Photo(photo.id));
                tree.set_aspect_ratio(item, photo.aspect_ratio)?;
                tree.set_view_type(item, PHOTO_VIEW)?;
                tree.append(block, item)?;
            }
        }
        Ok([header, block])
    }

    pub fn label(&self, entry: &Entry) -> String {
        match entry {
            Entry::Gallery => "gallery".to_owned(),
            Entry::Group(id) | Entry::Header(id) => format!("Group {id}"),
            Entry::Photos(id) => format!("Photos of group {id}"),
            Entry::Photo(id) => self
                .groups
                .get(id / GROUP_SIZE)
                .and_then(|group| group.photos.iter().find(|photo| photo.id == *id))
                .map_or_else(|| format!("Photo {id}"), |photo| photo.text.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generation_is_reproducible() {
        let a = Model::generate(7);
        let b = Model::generate(7);
        assert_eq!(a.photo_count(), GROUP_COUNT * GROUP_SIZE);
        let ratio = |model: &Model| model.groups[3].photos[9].aspect_ratio;
        assert_eq!(ratio(&a), ratio(&b));
        assert!(a
            .groups
            .iter()
            .flat_map(|group| &group.photos)
            .all(|photo| (1.0..2.0).contains(&photo.aspect_ratio)));
    }

    #[test]
    fn loaded_group_lays_out_header_then_rows() {
        let model = Model::generate(1);
        let mut tree = LayoutTree::new();
        let gallery = model.build_tree(&mut tree).unwrap();
        let placeholder = tree.child_ids(gallery)[0];
        let [header, block] = model.build_group(&mut tree, 0).unwrap();
        assert!(tree.replace_placeholder(placeholder, &[header, block]));

        tree.layout(gallery, 0.0, 0.0, 1000.0, 800.0).unwrap();
        assert_eq!(tree.node(header).unwrap().height(), HEADER_HEIGHT);
        assert_eq!(tree.node(block).unwrap().top(), HEADER_HEIGHT + GALLERY_MARGIN);
        assert_eq!(tree.child_count(block), GROUP_SIZE);
        assert_eq!(model.label(&Entry::Photo(12)), "Photo 12");
    }
}
