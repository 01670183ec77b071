//! Problem files: loose objects under a layout and a sequence of named constructions

use anyhow::{anyhow, bail, Context, Result};
use geogen_core::{
    ConfigurationObject, ConstructionRegistry, LooseObjectsHolder, LooseObjectsLayout, ObjectId,
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

/// One construction step of a problem
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Step {
    /// Name bound to the constructed object
    pub name: String,
    /// Predefined or composed construction name
    pub construction: String,
    /// Names of the inputs, in signature order
    pub inputs: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Problem {
    pub layout: LooseObjectsLayout,
    /// Names of the loose objects, in layout order
    pub loose_objects: Vec<String>,
    #[serde(default)]
    pub steps: Vec<Step>,
}

impl Problem {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
        serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))
    }
}

/// Names bound to configuration objects while a problem is replayed
#[derive(Debug, Default)]
pub struct Scope {
    objects: HashMap<String, Arc<ConfigurationObject>>,
    names: HashMap<ObjectId, String>,
}

impl Scope {
    /// Create the loose objects of `problem` and bind their names
    pub fn with_loose_objects(problem: &Problem) -> Result<(Self, LooseObjectsHolder)> {
        let holder = LooseObjectsHolder::with_layout(problem.layout);
        if holder.len() != problem.loose_objects.len() {
            bail!(
                "layout {:?} has {} loose objects, {} names given",
                problem.layout,
                holder.len(),
                problem.loose_objects.len()
            );
        }

        let mut scope = Scope::default();
        for (name, object) in problem.loose_objects.iter().zip(holder.loose_objects()) {
            scope.bind(name, Arc::clone(object))?;
        }
        Ok((scope, holder))
    }

    pub fn bind(&mut self, name: &str, object: Arc<ConfigurationObject>) -> Result<()> {
        if self.objects.contains_key(name) {
            bail!("name {} is bound twice", name);
        }
        self.names.insert(object.id(), name.to_string());
        self.objects.insert(name.to_string(), object);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Result<&Arc<ConfigurationObject>> {
        self.objects.get(name).ok_or_else(|| anyhow!("unknown object {}", name))
    }

    /// Bind `name` as an alias of an already bound object
    pub fn alias(&mut self, name: &str, id: ObjectId) -> Result<()> {
        let object = self
            .objects
            .values()
            .find(|object| object.id() == id)
            .cloned()
            .ok_or_else(|| anyhow!("object {} has no name", id))?;
        self.objects.insert(name.to_string(), object);
        Ok(())
    }

    pub fn name_of(&self, id: ObjectId) -> String {
        self.names.get(&id).cloned().unwrap_or_else(|| id.to_string())
    }

    /// The symbolic object a step describes
    pub fn build(&self, step: &Step) -> Result<Arc<ConfigurationObject>> {
        let construction = ConstructionRegistry::global().by_name(&step.construction)?;
        let inputs = step
            .inputs
            .iter()
            .map(|name| self.get(name).cloned())
            .collect::<Result<Vec<_>>>()?;

        ConfigurationObject::constructed(construction, &inputs).with_context(|| format!("step {}", step.name))
    }
}
