use crate::coords::Waypoint;
use crate::error::SearchResult;
use crate::PathFinder;

/// An agent that chases a target across the grid, one tile at a time
#[derive(Clone, Debug)]
pub struct Pursuer {
    /// Size of the pursuer's square area (should be ≤ tile size)
    pub size: f32,

    /// Floating-point position (center of the pursuer's square)
    pub fpos_x: f32,
    pub fpos_y: f32,

    /// Speed in world units per second
    pub speed: f32,

    /// Tile centre currently being walked to
    pub dest_x: Option<f32>,
    pub dest_y: Option<f32>,

    /// Result of the latest query, goal first
    path: Vec<Waypoint>,
}

impl Pursuer {
    /// Create a new pursuer at the given floating-point position
    pub fn new(fpos_x: f32, fpos_y: f32, size: f32, speed: f32) -> Self {
        Pursuer {
            size,
            fpos_x,
            fpos_y,
            speed,
            dest_x: None,
            dest_y: None,
            path: Vec::new(),
        }
    }

    pub fn position(&self) -> Waypoint {
        Waypoint::new(self.fpos_x, self.fpos_y)
    }

    /// Path found by the latest tick (empty if that query failed)
    pub fn path(&self) -> &[Waypoint] {
        &self.path
    }

    /// The next step toward the goal in a goal-to-start waypoint list:
    /// the entry just before the start at the tail. A single-waypoint path
    /// yields that waypoint.
    pub fn next_waypoint(path: &[Waypoint]) -> Option<Waypoint> {
        match path.len() {
            0 => None,
            1 => Some(path[0]),
            n => Some(path[n - 2]),
        }
    }

    /// Plan toward the target and advance for `delta_time` seconds.
    ///
    /// A fresh path is requested every tick. A step that is already under way
    /// is finished before a new one is taken, so the pursuer only ever moves
    /// between adjacent tile centres. On a query error the pursuer stays put
    /// and the error is handed back. Returns `true` once the pursuer shares
    /// the target's tile.
    pub fn tick(
        &mut self,
        finder: &PathFinder<'_>,
        target_x: f32,
        target_y: f32,
        delta_time: f32,
    ) -> SearchResult<bool> {
        let path = match finder.find_path(self.fpos_x, self.fpos_y, target_x, target_y) {
            Ok(path) => path,
            Err(e) => {
                self.path.clear();
                return Err(e);
            }
        };

        if self.dest_x.is_none() {
            if let Some(step) = self.choose_step(&path) {
                self.set_destination(step.x, step.y);
            }
        }
        let caught = path.len() <= 1;
        self.path = path;
        self.update(delta_time);

        Ok(caught)
    }

    fn choose_step(&self, path: &[Waypoint]) -> Option<Waypoint> {
        let start = *path.last()?;
        // Re-centre on the current tile before leaving it
        if start != self.position() {
            return Some(start);
        }
        Self::next_waypoint(path)
    }

    /// Set the destination for the pursuer
    pub fn set_destination(&mut self, dest_x: f32, dest_y: f32) {
        self.dest_x = Some(dest_x);
        self.dest_y = Some(dest_y);
    }

    /// Clear the destination
    pub fn clear_destination(&mut self) {
        self.dest_x = None;
        self.dest_y = None;
    }

    /// Move the pursuer towards its destination
    /// Returns true if the pursuer reached its destination
    pub fn update(&mut self, delta_time: f32) -> bool {
        if let (Some(dest_x), Some(dest_y)) = (self.dest_x, self.dest_y) {
            let dx = dest_x - self.fpos_x;
            let dy = dest_y - self.fpos_y;
            let distance = (dx * dx + dy * dy).sqrt();

            let movement_this_frame = self.speed * delta_time;
            if distance <= movement_this_frame {
                // Snap to destination
                self.fpos_x = dest_x;
                self.fpos_y = dest_y;
                self.clear_destination();
                return true;
            }

            self.fpos_x += dx / distance * movement_this_frame;
            self.fpos_y += dy / distance * movement_this_frame;

            false
        } else {
            true
        }
    }

    /// Get the corners of the pursuer's square in world coordinates
    pub fn get_bounds(&self) -> (f32, f32, f32, f32) {
        let half_size = self.size / 2.0;
        let left = self.fpos_x - half_size;
        let top = self.fpos_y - half_size;
        let right = self.fpos_x + half_size;
        let bottom = self.fpos_y + half_size;

        (left, top, right, bottom)
    }
}
