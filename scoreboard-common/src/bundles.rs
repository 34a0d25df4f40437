use crate::game_snapshot::Team;
use core::ops::{Index, IndexMut};
use derivative::Derivative;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

#[derive(Derivative, Serialize, Deserialize)]
#[derivative(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub struct HomeVisitorBundle<T> {
    pub home: T,
    pub visitor: T,
}

impl<T> HomeVisitorBundle<T> {
    pub fn iter(&self) -> impl Iterator<Item = (Team, &T)> {
        self.into_iter()
    }
}

impl<T> Index<Team> for HomeVisitorBundle<T> {
    type Output = T;

    fn index(&self, team: Team) -> &Self::Output {
        match team {
            Team::Home => &self.home,
            Team::Visitor => &self.visitor,
        }
    }
}

impl<T> IndexMut<Team> for HomeVisitorBundle<T> {
    fn index_mut(&mut self, team: Team) -> &mut Self::Output {
        match team {
            Team::Home => &mut self.home,
            Team::Visitor => &mut self.visitor,
        }
    }
}

impl<T: Display> Display for HomeVisitorBundle<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Home: {}, Visitor: {}", self.home, self.visitor)
    }
}

pub struct HomeVisitorBundleIterator<'a, T> {
    bundle: &'a HomeVisitorBundle<T>,
    index: usize,
}

impl<'a, T> Iterator for HomeVisitorBundleIterator<'a, T> {
    type Item = (Team, &'a T);

    fn next(&mut self) -> Option<Self::Item> {
        let value = match self.index {
            0 => (Team::Home, &self.bundle.home),
            1 => (Team::Visitor, &self.bundle.visitor),
            _ => return None,
        };

        self.index += 1;
        Some(value)
    }
}

impl<'a, T> IntoIterator for &'a HomeVisitorBundle<T> {
    type Item = (Team, &'a T);
    type IntoIter = HomeVisitorBundleIterator<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        HomeVisitorBundleIterator {
            bundle: self,
            index: 0,
        }
    }
}

impl<T> IntoIterator for HomeVisitorBundle<T> {
    type Item = (Team, T);
    type IntoIter = std::vec::IntoIter<Self::Item>;

    fn into_iter(self) -> Self::IntoIter {
        vec![(Team::Home, self.home), (Team::Visitor, self.visitor)].into_iter()
    }
}

impl<T: Default> FromIterator<(Team, T)> for HomeVisitorBundle<T> {
    fn from_iter<I: IntoIterator<Item = (Team, T)>>(iter: I) -> Self {
        let mut bundle = HomeVisitorBundle::default();
        for (team, value) in iter {
            match team {
                Team::Home => bundle.home = value,
                Team::Visitor => bundle.visitor = value,
            }
        }
        bundle
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_index_matches_fields() {
        let mut bundle = HomeVisitorBundle { home: 3, visitor: 7 };
        assert_eq!(bundle[Team::Home], 3);
        assert_eq!(bundle[Team::Visitor], 7);

        bundle[Team::Visitor] += 1;
        assert_eq!(bundle.visitor, 8);
    }

    #[test]
    fn test_iter_order() {
        let bundle = HomeVisitorBundle { home: 1, visitor: 2 };
        let collected: Vec<_> = bundle.iter().map(|(t, v)| (t, *v)).collect();
        assert_eq!(collected, vec![(Team::Home, 1), (Team::Visitor, 2)]);
    }
}
