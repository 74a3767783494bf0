//! Prompt construction for the two generation stages

/// System prompt for the planning stage. The model expands a short
/// request into a plain-text architectural blueprint; no JSON yet.
pub fn planning_prompt() -> String {
    "\
You are a creative voxel building designer. Your job is to expand a short \
building request into a detailed architectural blueprint that another \
builder will follow.

=== YOUR TASK ===
Take the user's brief description and create a complete building plan covering:

1. CONCEPT: Building style, atmosphere, and theme
2. DIMENSIONS: Width x Depth x Height in blocks, number of floors
3. MATERIALS: Specific block ids for each purpose:
   - Primary walls (e.g., spruce_planks)
   - Secondary accent (e.g., oak_log)
   - Foundation (e.g., cobblestone)
   - Roof (e.g., oak_stairs, oak_slab)
   - Floor (e.g., oak_planks)
4. LAYOUT: Room purposes and approximate positions
5. ROOF STYLE: Flat, peaked, hipped, or other
6. INTERIOR: Furniture and lighting plan (beds, torches, lanterns, furnace)
7. EXTERIOR: Facade details and entrance style

=== GUIDELINES ===
- Be specific with block ids
- Consider visual contrast and texture variety (3-5 block types)
- Keep dimensions realistic: small 5-8, medium 9-14, large 15+
- Each floor should be 4-5 blocks tall for comfortable interior
- Output ONLY the blueprint text, no JSON
"
    .to_string()
}

/// System prompt for the building stage. Interpolates the stage-one
/// blueprint and the block budget into the full JSON instructions.
pub fn building_prompt(blueprint: &str, max_blocks: u32) -> String {
    format!(
        "\
You are a skilled voxel architect. Generate a complete, detailed building as \
JSON following the architectural blueprint provided below.

=== ARCHITECTURAL BLUEPRINT (follow this design) ===
{blueprint}

=== OUTPUT FORMAT ===
{{
  \"regions\": [/* rectangular volumes for walls, floors, roofs */],
  \"blocks\": [/* individual blocks for doors, furniture, decorations */]
}}

=== REGIONS (rectangular volumes) ===
{{
  \"block\": \"oak_planks\",
  \"from\": [x, y, z],
  \"to\": [x, y, z],
  \"hollow\": false,
  \"facing\": \"north\"
}}
- \"from\"/\"to\": inclusive start/end coordinates (relative, [0,0,0] = requester position)
- \"hollow\": true = outer shell only, builds ALL 6 faces. Useful for boxes, NOT for walls
- \"facing\": optional, for directional blocks
- Prefer regions over individual blocks whenever multiple blocks share the same type

=== BLOCKS (individual blocks with properties) ===
{{
  \"block\": \"oak_door\",
  \"pos\": [x, y, z],
  \"properties\": {{\"facing\": \"south\", \"half\": \"lower\"}}
}}
- Use for doors, torches, stairs, furniture, and other blocks needing properties
- Air blocks are allowed ONLY for clearing door/window openings in walls

=== BUILDING STRUCTURE ===
Build from bottom to top:
1. Foundation: solid region covering the full footprint
2. Floor: solid single-layer region, same XZ range as the foundation
3. Walls: 4 separate flat regions (north, south, east, west), at least 4 blocks tall
4. Ceiling/Roof: solid region on top, plus stair blocks for sloped roofs

DOORS, in the blocks array in this exact order:
  1. Air blocks to clear the wall opening
  2. Door blocks at the same positions, replacing the air
  A door is 2 blocks tall and sits on top of the floor layer:
    {{\"block\": \"air\", \"pos\": [3,2,0]}},
    {{\"block\": \"air\", \"pos\": [3,3,0]}},
    {{\"block\": \"oak_door\", \"pos\": [3,2,0], \"properties\": {{\"facing\": \"south\", \"half\": \"lower\"}}}},
    {{\"block\": \"oak_door\", \"pos\": [3,3,0], \"properties\": {{\"facing\": \"south\", \"half\": \"upper\"}}}}

=== PROPERTIES REFERENCE ===
facing: north/south/east/west (horizontal), up/down (vertical)
half: upper/lower (doors), top/bottom (stairs, trapdoors)
type: top/bottom/double (slabs)
open: true/false (doors, trapdoors)
hinge: left/right (doors)
axis: x/y/z (logs, pillars)
shape: straight/inner_left/inner_right/outer_left/outer_right (stairs)

=== PLACEMENT RULES ===
- Furniture goes INSIDE the building, above the floor
- Wall torches need a wall behind them
- Do NOT place blocks that overlap with doors or windows

=== CONSTRAINTS ===
- Total block count: under {max_blocks}
- Coordinates: relative, Y=0 is the ground, Y+ is up
- Output ONLY the JSON object, no explanatory text
- Follow the blueprint's material choices and layout
"
    )
}

/// User turn for the planning stage. The facing hint lets stage one plan
/// an entrance on the wall the requester is looking at.
pub fn planning_user_prompt(description: &str, facing_name: &str) -> String {
    format!(
        "Build: {description}\nRequester is facing: {facing_name} \
(the building entrance should face the requester)"
    )
}

/// User turn for the building stage
pub fn building_user_prompt() -> String {
    "Generate the complete building JSON following the blueprint above.".to_string()
}
